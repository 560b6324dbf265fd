/// price changes mid-lifetime - reconstructing what was actually paid
use recurring_obligations_rs::chrono::{NaiveDate, TimeZone, Utc};
use recurring_obligations_rs::{
    EventStore, Money, Obligation, ObligationCalculator, ObligationKind, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // pin the clock so the output is reproducible
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).single().ok_or("bad time")?;
    let time = SafeTimeProvider::new(TimeSource::Test(now));
    let today = time.now().date_naive();

    let first = NaiveDate::from_ymd_opt(2024, 1, 10).ok_or("bad date")?;
    let april = NaiveDate::from_ymd_opt(2024, 4, 10).ok_or("bad date")?;

    let mut music = Obligation::builder(ObligationKind::Subscription)
        .name("music")
        .first_payment_date(first)
        .value(Money::from_str_exact("29.90")?)
        .payments_made(3)
        .build()?;

    let mut events = EventStore::new();
    music.adjust_value(Money::from_str_exact("39.90")?, april, &mut events)?;
    for _ in 0..5 {
        music.record_payment(&mut events)?;
    }

    let calculator = ObligationCalculator::default();
    for charge in calculator.paid_cycle_breakdown(&music, today) {
        println!("cycle {:>2}  {}  {}", charge.cycle_number, charge.due_date, charge.amount);
    }

    let snapshot = calculator.snapshot(&music, &time);
    println!("total spent: {}", snapshot.total_spent);
    println!("next payment: {} on {:?}", snapshot.next_payment_value, snapshot.next_due_date);

    for event in events.take_events() {
        println!("{event:?}");
    }

    Ok(())
}
