/// quick start - project an installment plan and a subscription
use recurring_obligations_rs::chrono::NaiveDate;
use recurring_obligations_rs::{
    BillingCycle, EventStore, Money, Obligation, ObligationCalculator, ObligationKind,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?;

    // 12 x 100 with nothing down
    let mut fridge = Obligation::builder(ObligationKind::Installment)
        .name("fridge")
        .first_payment_date(start)
        .value(Money::from_major(100))
        .installments_total(12)
        .build()?;

    let mut streaming = Obligation::subscription("streaming", start, BillingCycle::Monthly, Money::from_str_exact("39.90")?);

    // record a few payments
    let mut events = EventStore::new();
    for _ in 0..5 {
        fridge.record_payment(&mut events)?;
        streaming.record_payment(&mut events)?;
    }

    // project with the system clock at the outermost boundary
    let time = SafeTimeProvider::new(TimeSource::System);
    let calculator = ObligationCalculator::default();

    println!("{}", calculator.snapshot(&fridge, &time).json());
    println!("{}", calculator.snapshot(&streaming, &time).json());
    println!("{} events recorded", events.len());

    Ok(())
}
