use bot_provisioning_core::loan_classification::{
    categorize, classify_loan, classify_portfolio, validate_bot_compliance, LoanCategory,
};
use bot_provisioning_core::{LoanRecord, LoanType};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn evaluation_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 31, 8, 30, 0).unwrap()
}

fn loan_overdue(id: &str, loan_type: LoanType, outstanding: Decimal, days: i64) -> LoanRecord {
    LoanRecord {
        id: id.into(),
        outstanding_amount: outstanding,
        principal_amount: outstanding,
        interest_rate: dec!(0.22),
        loan_type,
        disbursement_date: NaiveDate::from_ymd_opt(2022, 1, 15),
        maturity_date: Some(evaluation_date().date_naive() - Duration::days(days)),
    }
}

// ===========================================================================
// Bucketing
// ===========================================================================

#[test]
fn test_every_day_count_maps_to_one_category() {
    for loan_type in [LoanType::General, LoanType::HousingMicrofinance] {
        let mut previous = LoanCategory::Current;
        for days in 0..=2_000i64 {
            let loan = loan_overdue("X", loan_type, dec!(1_000), days);
            let result = classify_loan(&loan, evaluation_date());
            assert_eq!(result.days_past_due as i64, days);
            assert_eq!(result.category, categorize(loan_type, result.days_past_due));
            // Categories only worsen as days accumulate.
            assert!(result.category >= previous, "{:?} dpd={}", loan_type, days);
            previous = result.category;
        }
        assert_eq!(previous, LoanCategory::Loss);
    }
}

#[test]
fn test_housing_never_especially_mentioned() {
    for days in 0..=2_000u32 {
        assert_ne!(
            categorize(LoanType::HousingMicrofinance, days),
            LoanCategory::EspeciallyMentioned
        );
    }
}

#[test]
fn test_general_boundary_exactness() {
    let cases = [
        (5, LoanCategory::Current),
        (6, LoanCategory::EspeciallyMentioned),
        (30, LoanCategory::EspeciallyMentioned),
        (31, LoanCategory::Substandard),
        (90, LoanCategory::Doubtful),
        (91, LoanCategory::Loss),
    ];
    for (days, expected) in cases {
        let loan = loan_overdue("G", LoanType::General, dec!(1_000), days);
        assert_eq!(classify_loan(&loan, evaluation_date()).category, expected);
    }
}

#[test]
fn test_housing_boundary_exactness() {
    let cases = [
        (90, LoanCategory::Current),
        (91, LoanCategory::Substandard),
        (180, LoanCategory::Substandard),
        (181, LoanCategory::Doubtful),
        (360, LoanCategory::Doubtful),
        (361, LoanCategory::Loss),
    ];
    for (days, expected) in cases {
        let loan = loan_overdue("H", LoanType::HousingMicrofinance, dec!(1_000), days);
        assert_eq!(classify_loan(&loan, evaluation_date()).category, expected);
    }
}

// ===========================================================================
// Provisioning
// ===========================================================================

#[test]
fn test_provision_amount_identity() {
    let amounts = [dec!(0), dec!(1), dec!(999_999.99), dec!(12_345_678.901)];
    for amount in amounts {
        for days in [0, 10, 45, 75, 100, 200, 400] {
            for loan_type in [LoanType::General, LoanType::HousingMicrofinance] {
                let loan = loan_overdue("P", loan_type, amount, days);
                let r = classify_loan(&loan, evaluation_date());
                assert_eq!(r.provision_amount, amount * r.provision_rate);
                assert_eq!(r.provision_rate, r.category.provision_rate());
            }
        }
    }
}

#[test]
fn test_general_45_days_scenario() {
    let loan = loan_overdue("S1", LoanType::General, dec!(1_000_000), 45);
    let r = classify_loan(&loan, evaluation_date());
    assert_eq!(r.category, LoanCategory::Substandard);
    assert_eq!(r.provision_rate, dec!(0.25));
    assert_eq!(r.provision_amount, dec!(250_000));
}

#[test]
fn test_housing_200_days_scenario() {
    let loan = loan_overdue("S2", LoanType::HousingMicrofinance, dec!(2_000_000), 200);
    let r = classify_loan(&loan, evaluation_date());
    assert_eq!(r.category, LoanCategory::Doubtful);
    assert_eq!(r.provision_rate, dec!(0.50));
    assert_eq!(r.provision_amount, dec!(1_000_000));
}

// ===========================================================================
// Portfolio
// ===========================================================================

#[test]
fn test_two_loan_portfolio_scenario() {
    let loans = vec![
        loan_overdue("A", LoanType::General, dec!(500_000), 0),
        loan_overdue("B", LoanType::General, dec!(300_000), 95),
    ];
    let out = classify_portfolio(&loans, evaluation_date());
    assert_eq!(out.npl_ratio, dec!(37.5));
    assert_eq!(out.par90, dec!(50));
}

#[test]
fn test_portfolio_aggregation_consistency() {
    let mut loans = Vec::new();
    for i in 0..200i64 {
        let loan_type = if i % 3 == 0 {
            LoanType::HousingMicrofinance
        } else {
            LoanType::General
        };
        let amount = Decimal::from(10_000 + i * 7_919) + dec!(0.25);
        loans.push(loan_overdue(&format!("L{:03}", i), loan_type, amount, i * 3));
    }
    let out = classify_portfolio(&loans, evaluation_date());
    let amount: Decimal = out.buckets.iter().map(|(_, b)| b.amount).sum();
    let provision: Decimal = out.buckets.iter().map(|(_, b)| b.provision).sum();
    assert_eq!(amount, out.total_outstanding);
    assert_eq!(provision, out.total_provision_required);
    assert_eq!(out.loan_count, 200);
    assert_eq!(out.loans.len(), 200);
}

#[test]
fn test_empty_portfolio_is_all_zero() {
    let out = classify_portfolio(&[], evaluation_date());
    assert_eq!(out.total_outstanding, Decimal::ZERO);
    assert_eq!(out.npl_ratio, Decimal::ZERO);
    assert_eq!(out.par30, Decimal::ZERO);
    assert_eq!(out.par90, Decimal::ZERO);
    assert_eq!(out.provision_coverage_ratio, Decimal::ZERO);
}

#[test]
fn test_portfolio_from_json() {
    let json = r#"[
        {"id": "T-1", "outstanding_amount": "500000", "loan_type": "general",
         "disbursement_date": "2024-01-01", "maturity_date": "2025-12-31"},
        {"id": "T-2", "outstanding_amount": "300000", "loan_type": "general",
         "disbursement_date": "2024-01-01", "maturity_date": "2025-09-27"},
        {"id": "T-3", "outstanding_amount": "200000", "loan_type": "housing_microfinance",
         "maturity_date": "corrupted"}
    ]"#;
    let loans: Vec<LoanRecord> = serde_json::from_str(json).unwrap();
    let out = classify_portfolio(&loans, evaluation_date());
    // T-2 is 95 days past due.
    assert_eq!(out.loans[1].days_past_due, 95);
    assert_eq!(out.loans[1].category, LoanCategory::Loss);
    assert_eq!(out.loans[2].category, LoanCategory::Current);
    assert_eq!(out.missing_maturity_count, 1);
    assert_eq!(out.npl_ratio, dec!(30));
}

// ===========================================================================
// Compliance
// ===========================================================================

#[test]
fn test_backdated_classification_goes_stale() {
    let loan = loan_overdue("C1", LoanType::General, dec!(400_000), 35);
    let last_month = evaluation_date() - Duration::days(31);
    let recorded = classify_loan(&loan, last_month);
    assert_eq!(recorded.category, LoanCategory::Current);
    assert!(validate_bot_compliance(&loan, &recorded, last_month));
    assert!(!validate_bot_compliance(&loan, &recorded, evaluation_date()));
}
