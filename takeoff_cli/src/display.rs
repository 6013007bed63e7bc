//! Console rendering for records, summaries, and rate tables.

use std::io::{self, Write};

use takeoff_core::calculations::ResultRecord;
use takeoff_core::ledger::LedgerSummary;
use takeoff_core::rates::{ConcreteZone, RateTable, RebarSize, VaporBarrierType, XpsRValue};

const RULE: &str = "═══════════════════════════════════════";

/// Zero quantities print as "-" so the relevant rows stand out
fn quantity(value: f64, unit: &str) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{:.2} {}", value, unit)
    }
}

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn write_record<W: Write>(out: &mut W, record: &ResultRecord) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    if record.label.is_empty() {
        writeln!(out, "  {}", record.component)?;
    } else {
        writeln!(out, "  {} ({})", record.component, record.label)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Input:    L={:.2} ft  H={:.2} ft  T={:.2} in  Area={:.2} SF  Qty={}",
        record.length_ft, record.height_ft, record.thickness_in, record.area_sf, record.quantity
    )?;
    writeln!(out)?;
    writeln!(out, "Quantities:")?;
    writeln!(out, "  Concrete:    {}", quantity(record.concrete_cy, "CY"))?;
    writeln!(out, "  Rebar:       {}", quantity(record.rebar_lf, "LF"))?;
    writeln!(out, "  XPS:         {}", quantity(record.xps_area_sf, "SF"))?;
    writeln!(out, "  Drain rock:  {}", quantity(record.drain_rock_cy, "CY"))?;
    writeln!(out, "  Fabric:      {}", quantity(record.fabric_lf, "LF"))?;
    writeln!(out, "  Pipe:        {}", quantity(record.pipe_lf, "LF"))?;
    writeln!(out)?;
    writeln!(out, "Costs:")?;
    let costs = [
        ("Concrete", record.concrete_cost),
        ("Rebar", record.rebar_cost),
        ("XPS", record.xps_cost),
        ("Drain", record.drain_cost),
        ("Vapor", record.vapor_cost),
        ("Finish", record.finish_cost),
    ];
    for (name, cost) in costs.iter().filter(|(_, cost)| *cost != 0.0) {
        writeln!(out, "  {:<12} {:>12}", name, money(*cost))?;
    }
    writeln!(out, "  {:<12} {:>12}", "Total cost", money(record.total_cost))?;
    writeln!(
        out,
        "  {:<12} {:>12}  (+{:.1}%)",
        "Sale price",
        money(record.sale_price),
        record.markup_pct
    )?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, records: &[ResultRecord], summary: &LedgerSummary) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  PROJECT TAKEOFF SUMMARY ({} items)", summary.record_count)?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "{:<4} {:<18} {:<10} {:>9} {:>9} {:>12} {:>12}",
        "#", "Component", "Label", "CY", "Rebar LF", "Cost", "Sale"
    )?;
    for (i, r) in records.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<18} {:<10} {:>9.2} {:>9.2} {:>12.2} {:>12.2}",
            i + 1,
            r.component.display_name(),
            r.label,
            r.concrete_cy,
            r.rebar_lf,
            r.total_cost,
            r.sale_price
        )?;
    }
    writeln!(out)?;
    writeln!(out, "  Concrete:    {:.2} CY", summary.concrete_cy)?;
    writeln!(out, "  Rebar:       {:.2} LF", summary.rebar_lf)?;
    writeln!(out, "  XPS:         {:.2} SF", summary.xps_area_sf)?;
    writeln!(out, "  Drain rock:  {:.2} CY", summary.drain_rock_cy)?;
    writeln!(out, "  Total cost:  {}", money(summary.total_cost))?;
    writeln!(out, "  Sale price:  {}", money(summary.sale_price))?;
    writeln!(out, "  Margin:      {} ({:.1}%)", money(summary.margin), summary.margin_pct)?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

pub fn write_rates<W: Write>(out: &mut W, rates: &RateTable) -> io::Result<()> {
    writeln!(out, "Concrete ($/CY):")?;
    for zone in ConcreteZone::ALL {
        writeln!(out, "  {:<8} {:>8.2}", zone.display_name(), rates.concrete_rate(zone))?;
    }
    writeln!(out, "Rebar ($/LF):")?;
    for size in RebarSize::ALL {
        writeln!(out, "  {:<8} {:>8.2}", size.display_name(), rates.rebar_rate(size))?;
    }
    writeln!(out, "Vapor barrier ($/SF):")?;
    for kind in VaporBarrierType::ALL {
        writeln!(out, "  {:<8} {:>8.2}", kind.display_name(), rates.vapor_rate(kind))?;
    }
    writeln!(out, "XPS ($/SF):")?;
    for r_value in XpsRValue::ALL {
        writeln!(out, "  {:<8} {:>8.2}", r_value.display_name(), rates.xps_rate(r_value))?;
    }
    let finish: Vec<String> = rates.finish.rates.iter().map(|r| format!("{:.2}", r)).collect();
    writeln!(out, "Finish ($/SF): {}", finish.join(", "))?;
    writeln!(
        out,
        "Drain: rock {:.2}/CY, fabric {:.2}/LF, pipe {:.2}/LF",
        rates.drain.rock_per_cy, rates.drain.fabric_per_lf, rates.drain.pipe_per_lf
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeoff_core::calculations::{calculate, ComponentSpec, ComponentType, JobInfo};
    use takeoff_core::ledger::ProjectLedger;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_record_hides_zero_quantities() {
        let job = JobInfo::new("P", "E");
        let spec = ComponentSpec::new(ComponentType::SpreadFooting)
            .with_label("F-1")
            .with_dimensions(3.0, 3.0, 12.0)
            .with_quantity(4);
        let record = calculate(&job, &spec, RateTable::builtin()).unwrap();
        let text = render(|out| write_record(out, &record));
        assert!(text.contains("Spread Footing (F-1)"));
        assert!(text.contains("Concrete:    1.47 CY"));
        assert!(text.contains("Rebar:       -"));
        assert!(!text.contains("  Finish "));
    }

    #[test]
    fn test_summary_lists_every_record() {
        let mut ledger = ProjectLedger::new("P", "E");
        let wall = ComponentSpec::new(ComponentType::FoundationWall).with_dimensions(10.0, 8.0, 8.0);
        ledger.add(calculate(ledger.job(), &wall, RateTable::builtin()).unwrap());
        ledger.add(calculate(ledger.job(), &wall, RateTable::builtin()).unwrap());
        let text = render(|out| write_summary(out, ledger.records(), &ledger.summary()));
        assert!(text.contains("(2 items)"));
        assert!(text.contains("Rebar:       344.00 LF"));
        assert!(text.contains("(20.0%)"));
    }

    #[test]
    fn test_rates_listing() {
        let text = render(|out| write_rates(out, RateTable::builtin()));
        assert!(text.contains("Zone 4     215.00"));
        assert!(text.contains("Finish ($/SF): 8.25, 8.50"));
    }
}
