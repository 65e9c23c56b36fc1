// ==========================================
// 需求分配引擎 - 命令行入口
// ==========================================
// 用法:
//   demand-alloc allocate <demands.csv> <lot_qty> [COMETS|MAXCIM]
//   demand-alloc split <input.json> [diagnostic|allocations]
// 输出: 结果 JSON 写 stdout，日志写 stderr
// 配置: DEMAND_ALLOC_CONFIG 指向 JSON 配置文件（可选）
// ==========================================

use anyhow::{bail, Context, Result};
use demand_alloc::config::EngineConfig;
use demand_alloc::domain::{Lot, ProductClass, SplitOutputKind, SplitPlanInput};
use demand_alloc::engine::AllocationOrchestrator;
use demand_alloc::importer::{parse_quantity, DemandCsvImporter};
use demand_alloc::logging;

const USAGE: &str = "用法:
  demand-alloc allocate <demands.csv> <lot_qty> [COMETS|MAXCIM]
  demand-alloc split <input.json> [diagnostic|allocations]";

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    let config = EngineConfig::from_env().context("加载引擎配置失败")?;
    tracing::info!(
        version = demand_alloc::VERSION,
        command = %command,
        "{}",
        demand_alloc::APP_NAME
    );
    let orchestrator = AllocationOrchestrator::new(config);

    let output = match command.as_str() {
        "allocate" => {
            let path = args.next().context(USAGE)?;
            let lot_qty = args.next().context(USAGE)?;
            let lot_qty = parse_quantity(&lot_qty)
                .map_err(anyhow::Error::msg)
                .context("批次数量非法")?;
            let class: ProductClass = match args.next() {
                Some(s) => s.parse().map_err(anyhow::Error::msg)?,
                None => ProductClass::Comets,
            };

            let lines = DemandCsvImporter::new()
                .import_file(&path)
                .with_context(|| format!("导入需求文件失败: {}", path))?;
            let lot = Lot::new(lot_qty, class)?;
            let outcome = orchestrator.run(&lot, lines)?;
            serde_json::to_string_pretty(&outcome)?
        }
        "split" => {
            let path = args.next().context(USAGE)?;
            let kind = match args.next().as_deref() {
                None | Some("diagnostic") => SplitOutputKind::Diagnostic,
                Some("allocations") => SplitOutputKind::Allocations,
                Some(other) => bail!("未知输出类型: {}\n{}", other, USAGE),
            };

            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("读取拆分输入失败: {}", path))?;
            let input: SplitPlanInput =
                serde_json::from_str(&raw).context("拆分输入 JSON 解析失败")?;
            let plan = orchestrator.plan_split_input(&input)?;
            serde_json::to_string_pretty(&plan.output(kind))?
        }
        _ => bail!("{}", USAGE),
    };

    println!("{}", output);
    Ok(())
}
