/// stored records - lenient ingestion of legacy rows and a monthly summary
use recurring_obligations_rs::chrono::NaiveDate;
use recurring_obligations_rs::{
    EngineConfig, InvestmentRecord, ObligationCalculator, ObligationRecord, YieldProjector,
};

const OBLIGATIONS: &str = r#"[
    { "name": "rent", "kind": "fixed", "recurringValue": 1500,
      "firstPaymentDate": "2024-01-05", "nextDueDate": "2024-07-05", "subscriptionPayments": 6 },
    { "name": "cloud", "kind": "subscription", "billingCycle": "annual", "recurringValue": 119.9,
      "firstPaymentDate": "2023-03-08T00:00:00.000Z", "nextDueDate": "2025-03-08", "subscriptionPayments": 2 },
    { "name": "bike", "kind": "installment", "installmentValue": 200, "installmentsTotal": 10,
      "downPayment": 300, "paidInstallments": 6, "firstPaymentDate": "2024-01-20" },
    { "name": "legacy", "kind": "installment", "installmentValue": 80, "installmentsTotal": 4,
      "paidInstallments": 1, "firstPaymentDate": "20/01/2024" }
]"#;

const RESERVES: &str = r#"[
    { "name": "old savings", "investmentType": "cdb_cdi", "monthlyRatePercent": 0.9, "currentValue": 2500 }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let today = NaiveDate::from_ymd_opt(2024, 7, 12).ok_or("bad date")?;
    let config = EngineConfig::default().with_due_soon_days(10);

    let records: Vec<ObligationRecord> = serde_json::from_str(OBLIGATIONS)?;
    let obligations = records
        .into_iter()
        .map(ObligationRecord::into_obligation)
        .collect::<Result<Vec<_>, _>>()?;

    let calculator = ObligationCalculator::new(config.clone());
    let summary = calculator.summarize_at(&obligations, today);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let projector = YieldProjector::new(&config);
    let reserves: Vec<InvestmentRecord> = serde_json::from_str(RESERVES)?;
    for record in reserves {
        let reserve = record.into_investment_box(projector.converter())?;
        let snapshot = projector.snapshot_at(&reserve, today);
        println!("{}: {}% a year, {} a day", reserve.name, snapshot.effective_annual_rate, snapshot.estimated_daily_yield);
    }

    Ok(())
}
