/// cash reserves - indexed yield and goal tracking
use recurring_obligations_rs::chrono::NaiveDate;
use recurring_obligations_rs::{Decimal, EngineConfig, EventStore, InvestmentBox, Money, YieldProjector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let today = NaiveDate::from_ymd_opt(2024, 6, 3).ok_or("bad date")?;
    let projector = YieldProjector::new(&EngineConfig::business_days());

    // 110% of a 10.65% benchmark
    let mut emergency = InvestmentBox::indexed(
        "emergency fund",
        Money::from_major(15_000),
        Decimal::new(1065, 2),
        Decimal::from(110),
    )
    .with_goal(Money::from_major(20_000));

    let mut events = EventStore::new();
    emergency.deposit(Money::from_major(2_000), &mut events)?;
    emergency.credit_yield(Money::from_str_exact("152.37")?, &mut events)?;

    let travel = InvestmentBox::new("travel", Money::from_major(3_200)).with_goal(Money::from_major(3_000));

    for reserve in [&emergency, &travel] {
        let snapshot = projector.snapshot_at(reserve, today);
        println!(
            "{:<15} rate {:>6}%  daily {:>6}  accrued {:>8}",
            reserve.name, snapshot.effective_annual_rate, snapshot.estimated_daily_yield, snapshot.accrued_yield
        );
        if let Some(goal) = snapshot.goal {
            println!("{:<15} goal {}% ({} to go)", "", goal.progress_percent, goal.remaining);
        }
    }

    println!("in one year: {}", projector.project_value(&emergency, 252));

    let summary = projector.summarize_at(&[emergency, travel], today);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
