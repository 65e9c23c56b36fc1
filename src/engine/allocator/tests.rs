use super::{allocate_in_sequence, candidate_floor, LotAllocator};
use crate::domain::demand::DemandLine;
use crate::domain::types::ProductClass;
use crate::engine::error::EngineError;
use crate::engine::ordering::DemandOrdering;

// ==========================================
// 测试辅助函数
// ==========================================

fn line(week: &str, part: &str, process: &str, balance: i64, std_qty: i64) -> DemandLine {
    DemandLine::parse(week, part, process, "STD", balance, std_qty).unwrap()
}

fn run(lot: u64, lines: Vec<DemandLine>, class: ProductClass) -> super::LotAllocation {
    let groups = DemandOrdering::new().order(lines);
    LotAllocator::default().allocate(lot, &groups, class).unwrap()
}

// ==========================================
// candidate_floor
// ==========================================

#[test]
fn test_candidate_floor_integer_path() {
    assert_eq!(candidate_floor(1000, 1000, 300, 1.0), 900);
    assert_eq!(candidate_floor(1000, 250, 300, 1.0), 0);
    assert_eq!(candidate_floor(650, 5000, 300, 1.0), 600);
    assert_eq!(candidate_floor(10, 10, 0, 1.0), 0);
}

#[test]
fn test_candidate_floor_buffered_path() {
    // 600 * 1.002 = 601.2; 601.2 / 300.6 = 2 -> 2 * 300.6 = 601.2 -> 602
    assert_eq!(candidate_floor(1000, 600, 300, 1.002), 602);
    // 批次限制: min(500, 601.2) = 500 -> 1 * 300.6 -> 301
    assert_eq!(candidate_floor(500, 600, 300, 1.002), 301);
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_single_non_packaging_line() {
    let result = run(
        100,
        vec![line("W10'24", "MAX1+", "LEADSCAN", 150, 0)],
        ProductClass::Comets,
    );

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].allocated_qty, 100);
    assert!(result.single_allocation);
    assert_eq!(result.summary.get("MAX1+").unwrap().allocated_qty, 100);
    assert_eq!(result.surplus_units, 0);
}

#[test]
fn test_packaging_full_balance_is_unrounded() {
    let result = run(
        1000,
        vec![line("W10'24", "MAX1+T", "TAPEREEL", 1000, 300)],
        ProductClass::Comets,
    );

    assert_eq!(result.records[0].allocated_qty, 1000);
    assert_eq!(result.summary.total(), 1000);
    assert_eq!(result.shaved_units, 0);
}

#[test]
fn test_balance_below_standard_quantity_takes_full_balance() {
    let result = run(
        1000,
        vec![line("W10'24", "MAX1+T", "TAPEREEL", 250, 300)],
        ProductClass::Comets,
    );

    // candidate_floor = 0, 250 >= 0 -> 全额 250
    assert_eq!(result.records[0].allocated_qty, 250);
    // 需求耗尽，剩余 750 并入唯一料号
    assert_eq!(result.unallocated_units, 750);
    assert_eq!(result.summary.total(), 1000);
    assert_eq!(result.destination_part.as_deref(), Some("MAX1+T"));
}

#[test]
fn test_surplus_redistribution_to_non_packaging_part() {
    let result = run(
        2030,
        vec![
            line("W10'24", "A+T", "TAPEREEL", 1630, 300),
            line("W10'24", "B+", "LEADSCAN", 400, 0),
        ],
        ProductClass::Comets,
    );

    assert_eq!(result.records[0].allocated_qty, 1630);
    assert_eq!(result.records[1].allocated_qty, 400);
    assert_eq!(result.shaved_units, 130);
    assert_eq!(result.destination_part.as_deref(), Some("B+"));
    assert_eq!(result.summary.get("A+T").unwrap().allocated_qty, 1500);
    assert_eq!(result.summary.get("B+").unwrap().allocated_qty, 530);
    assert_eq!(result.summary.total(), 2030);
}

#[test]
fn test_walk_stops_when_lot_exhausted() {
    let result = run(
        500,
        vec![
            line("W10'24", "A+", "LEADSCAN", 300, 0),
            line("W11'24", "B+", "LEADSCAN", 300, 0),
            line("W12'24", "C+", "LEADSCAN", 300, 0),
        ],
        ProductClass::Comets,
    );

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].allocated_qty, 300);
    assert_eq!(result.records[1].allocated_qty, 200);
    assert!(result.summary.get("C+").is_none());
    assert_eq!(result.summary.total(), 500);
}

#[test]
fn test_earlier_week_served_before_larger_later_demand() {
    let result = run(
        100,
        vec![
            line("W20'24", "LATE+", "LEADSCAN", 1000, 0),
            line("W05'24", "EARLY+", "LEADSCAN", 60, 0),
        ],
        ProductClass::Comets,
    );

    assert_eq!(result.records[0].finish_part_number, "EARLY+");
    assert_eq!(result.records[0].allocated_qty, 60);
    assert_eq!(result.records[1].allocated_qty, 40);
}

#[test]
fn test_two_packaging_parts_surplus_goes_to_packlabel() {
    let result = run(
        1000,
        vec![
            line("W10'24", "A+T", "TAPEREEL", 650, 300),
            line("W10'24", "A+P", "PACKLABEL", 350, 100),
        ],
        ProductClass::Comets,
    );

    // A+T: 650 -> 600 (削 50)，A+P: 350 -> 300 (削 50)，余量 100 -> PACKLABEL
    assert_eq!(result.shaved_units, 100);
    assert_eq!(result.destination_part.as_deref(), Some("A+P"));
    assert_eq!(result.summary.get("A+T").unwrap().allocated_qty, 600);
    assert_eq!(result.summary.get("A+P").unwrap().allocated_qty, 400);
}

#[test]
fn test_maxcim_buffer_can_round_up_past_balance() {
    let lines = vec![
        line("W10'24", "A+T", "TAPEREEL", 600, 300),
        line("W11'24", "B+", "LEADSCAN", 1000, 0),
    ];

    let comets = run(1000, lines.clone(), ProductClass::Comets);
    assert_eq!(comets.records[0].allocated_qty, 600);

    // balance 600 < candidate_floor 602 -> min(1000, 602)
    let maxcim = run(1000, lines, ProductClass::Maxcim);
    assert_eq!(maxcim.records[0].allocated_qty, 602);
    assert_eq!(maxcim.records[1].allocated_qty, 398);
    assert_eq!(maxcim.summary.total(), 1000);
    assert_eq!(maxcim.summary.get("A+T").unwrap().allocated_qty, 600);
    assert_eq!(maxcim.summary.get("B+").unwrap().allocated_qty, 400);
}

// ==========================================
// 异常与边界
// ==========================================

#[test]
fn test_no_positive_balance_rejected() {
    let groups = DemandOrdering::new().order(vec![line("W10'24", "A+", "LEADSCAN", 0, 0)]);
    let err = LotAllocator::default()
        .allocate(100, &groups, ProductClass::Comets)
        .unwrap_err();
    assert!(matches!(err, EngineError::NoAllocatableDemand { .. }));
    assert!(err.is_malformed_input());
}

#[test]
fn test_zero_lot_rejected() {
    let groups = DemandOrdering::new().order(vec![line("W10'24", "A+", "LEADSCAN", 10, 0)]);
    let err = LotAllocator::default()
        .allocate(0, &groups, ProductClass::Comets)
        .unwrap_err();
    assert!(err.is_malformed_input());
}

#[test]
fn test_conservation_and_closure_over_mixed_inputs() {
    let processes = ["TAPEREEL", "LEADSCAN", "PACKLABEL", "BDPACK-TR", "BDPACK-LS"];
    for lot in [1u64, 99, 300, 777, 1234, 5000] {
        let lines: Vec<DemandLine> = (0..10)
            .map(|i| {
                line(
                    &format!("W{:02}'24", 10 + (i % 4)),
                    &format!("P{}", i % 6),
                    processes[i % 6 % processes.len()],
                    (50 + 137 * i as i64) % 900,
                    100 + 25 * (i as i64 % 3),
                )
            })
            .collect();

        let groups = DemandOrdering::new().order(lines.clone());
        let result = LotAllocator::default().allocate(lot, &groups, ProductClass::Comets);
        let result = match result {
            Ok(r) => r,
            Err(EngineError::NoAllocatableDemand { .. }) => continue,
            Err(e) => panic!("lot={} 意外错误: {}", lot, e),
        };

        assert_eq!(result.summary.total(), lot, "lot={}", lot);
        for record in &result.records {
            let source = lines
                .iter()
                .find(|l| {
                    l.finish_part_number == record.finish_part_number
                        && l.due_week == record.due_week
                })
                .unwrap();
            assert!(record.allocated_qty <= source.remaining_balance);
        }
        if !result.single_allocation {
            for part in result.summary.parts() {
                if Some(&part.finish_part_number) != result.destination_part.as_ref() {
                    assert_eq!(part.packaging_remainder(), 0, "lot={} part={}", lot, part.finish_part_number);
                }
            }
        }
    }
}

#[test]
fn test_allocate_in_sequence() {
    assert_eq!(allocate_in_sequence(&[100, 200, 300], 250), vec![100, 150, 0]);
    assert_eq!(allocate_in_sequence(&[100, 200], 1000), vec![100, 200]);
    assert!(allocate_in_sequence(&[], 10).is_empty());
}
