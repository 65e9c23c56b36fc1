// ==========================================
// 批次分配集成测试
// ==========================================
// 职责: 验证 排序 -> 分配 -> 回补 -> 判定 全流程
// ==========================================


use demand_alloc::domain::{AllocationCategory, Lot, ProductClass};
use demand_alloc::engine::{AllocationOrchestrator, EngineError};
use test_helpers::{demand, DemandBuilder};

fn orchestrator() -> AllocationOrchestrator {
    demand_alloc::logging::init_test();
    AllocationOrchestrator::default()
}

#[test]
fn test_single_leadscan_demand_is_full() {
    let lot = Lot::new(100, ProductClass::Comets).unwrap();
    let outcome = orchestrator()
        .run(&lot, vec![demand("W10'24", "MAX1+", "LEADSCAN", 150, 0)])
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].allocated_qty, 100);
    assert_eq!(outcome.summary.get("MAX1+").unwrap().allocated_qty, 100);
    assert_eq!(outcome.category, AllocationCategory::Full);
}

#[test]
fn test_tapereel_exact_balance_is_full() {
    let lot = Lot::new(1000, ProductClass::Comets).unwrap();
    let outcome = orchestrator()
        .run(&lot, vec![demand("W10'24", "MAX1+T", "TAPEREEL", 1000, 300)])
        .unwrap();

    assert_eq!(outcome.records[0].allocated_qty, 1000);
    assert_eq!(outcome.category, AllocationCategory::Full);
}

#[test]
fn test_mixed_parts_reconciled_and_split() {
    let lot = Lot::new(2030, ProductClass::Comets).unwrap();
    let outcome = orchestrator()
        .run(
            &lot,
            vec![
                demand("W10'24", "B+", "LEADSCAN", 400, 0),
                demand("W10'24", "A+T", "TAPEREEL", 1630, 300),
            ],
        )
        .unwrap();

    // 同周内按余量降序: A+T 先于 B+
    assert_eq!(outcome.records[0].finish_part_number, "A+T");
    assert_eq!(outcome.summary.get("A+T").unwrap().allocated_qty, 1500);
    assert_eq!(outcome.summary.get("B+").unwrap().allocated_qty, 530);
    assert_eq!(outcome.summary.total(), 2030);
    assert_eq!(outcome.category, AllocationCategory::Split);
}

#[test]
fn test_customer_specific_part_forces_split() {
    let lot = Lot::new(300, ProductClass::Comets).unwrap();
    let line = DemandBuilder::new("A+C")
        .process("TAPEREEL")
        .cust()
        .balance(300)
        .std_qty(100)
        .build();
    let outcome = orchestrator().run(&lot, vec![line]).unwrap();

    assert_eq!(outcome.summary.non_zero_count(), 1);
    assert_eq!(outcome.category, AllocationCategory::Split);
}

#[test]
fn test_earliest_week_served_first_regardless_of_input_order() {
    let lot = Lot::new(500, ProductClass::Comets).unwrap();
    let lines = vec![
        demand("W12'24", "C+", "LEADSCAN", 300, 0),
        demand("W10'24", "A+", "LEADSCAN", 300, 0),
        demand("W11'24", "B+", "LEADSCAN", 300, 0),
    ];
    let outcome = orchestrator().run(&lot, lines).unwrap();

    assert_eq!(outcome.summary.get("A+").unwrap().allocated_qty, 300);
    assert_eq!(outcome.summary.get("B+").unwrap().allocated_qty, 200);
    assert!(outcome.summary.get("C+").is_none());
}

#[test]
fn test_year_boundary_ordering() {
    let lot = Lot::new(100, ProductClass::Comets).unwrap();
    let lines = vec![
        demand("W01'25", "NEXT+", "LEADSCAN", 100, 0),
        demand("W52'24", "PREV+", "LEADSCAN", 100, 0),
    ];
    let outcome = orchestrator().run(&lot, lines).unwrap();
    assert_eq!(outcome.summary.get("PREV+").unwrap().allocated_qty, 100);
    assert!(outcome.summary.get("NEXT+").is_none());
}

#[test]
fn test_maxcim_buffer_rounds_packaging_up() {
    let lines = vec![
        demand("W10'24", "A+T", "TAPEREEL", 600, 300),
        demand("W11'24", "B+", "LEADSCAN", 1000, 0),
    ];
    let lot = Lot::new(1000, ProductClass::Maxcim).unwrap();
    let outcome = orchestrator().run(&lot, lines).unwrap();

    assert_eq!(outcome.records[0].allocated_qty, 602);
    assert_eq!(outcome.summary.get("A+T").unwrap().allocated_qty, 600);
    assert_eq!(outcome.summary.get("B+").unwrap().allocated_qty, 400);
}

#[test]
fn test_malformed_input_rejected() {
    let lot = Lot::new(100, ProductClass::Comets).unwrap();
    let mut bad = demand("W10'24", "A+T", "TAPEREEL", 100, 100);
    bad.standard_quantity = 0;

    let err = orchestrator().run(&lot, vec![bad]).unwrap_err();
    assert!(err.is_malformed_input());

    let err = orchestrator()
        .run(&lot, vec![demand("W10'24", "A+", "LEADSCAN", 0, 0)])
        .unwrap_err();
    assert!(matches!(err, EngineError::NoAllocatableDemand { .. }));
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let lines = vec![
        demand("W10'24", "A+T", "TAPEREEL", 650, 300),
        demand("W10'24", "A+P", "PACKLABEL", 350, 100),
        demand("W11'24", "A+", "LEADSCAN", 200, 0),
    ];
    let lot = Lot::new(1100, ProductClass::Comets).unwrap();
    let first = orchestrator().run(&lot, lines.clone()).unwrap();
    let second = orchestrator().run(&lot, lines).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.summary.total(), 1100);
}
