//! Interactive takeoff session.
//!
//! Each pass through the loop is one form submission: pick a component,
//! enter dimensions and selections, review the result, and decide whether
//! to add it to the ledger. The ledger is owned by the caller and passed in
//! by `&mut`.

use std::io::{self, BufRead, Write};

use takeoff_core::calculations::{calculate, ComponentSpec, ComponentType};
use takeoff_core::config::EstimateDefaults;
use takeoff_core::ledger::ProjectLedger;
use takeoff_core::rates::{ConcreteZone, RateTable, RebarSize, VaporBarrierType, XpsRValue};
use tracing::{info, warn};

use crate::display;
use crate::prompt::Prompter;

/// What the user chose at the main menu
enum MenuChoice {
    Component(ComponentType),
    Summary,
    Quit,
}

/// Run the form loop until the user quits or input ends.
pub fn run<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    ledger: &mut ProjectLedger,
    defaults: &EstimateDefaults,
    rates: &RateTable,
) -> io::Result<()> {
    info!(session = %ledger.meta.session_id, project = %ledger.job().project_name, "session started");

    loop {
        let component = match menu(prompter)? {
            MenuChoice::Component(component) => component,
            MenuChoice::Summary => {
                display::write_summary(prompter.out(), ledger.records(), &ledger.summary())?;
                continue;
            }
            MenuChoice::Quit => break,
        };

        let spec = read_spec(prompter, component, defaults, rates)?.clamped();
        match calculate(ledger.job(), &spec, rates) {
            Ok(record) => {
                display::write_record(prompter.out(), &record)?;
                if prompter.yes_no("Add to project dataset?", true)? {
                    ledger.add(record);
                    writeln!(prompter.out(), "Added. Dataset now has {} item(s).", ledger.len())?;
                }
            }
            Err(e) => {
                warn!(error = %e, "calculation rejected");
                writeln!(prompter.out(), "Error: {}", e)?;
            }
        }
    }

    info!(session = %ledger.meta.session_id, records = ledger.len(), "session ended");
    Ok(())
}

fn menu<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> io::Result<MenuChoice> {
    let out = prompter.out();
    writeln!(out)?;
    writeln!(out, "Component type:")?;
    for (i, component) in ComponentType::ALL.iter().enumerate() {
        writeln!(out, "  {:>2}) {}", i + 1, component)?;
    }
    writeln!(out, "   s) Show project summary")?;
    writeln!(out, "   q) Finish session")?;

    loop {
        let Some(answer) = prompter.line("> ")? else {
            return Ok(MenuChoice::Quit);
        };
        match answer.to_lowercase().as_str() {
            "q" | "quit" | "exit" => return Ok(MenuChoice::Quit),
            "s" | "summary" => return Ok(MenuChoice::Summary),
            "" => continue,
            other => {
                if let Ok(index) = other.parse::<usize>() {
                    if (1..=ComponentType::ALL.len()).contains(&index) {
                        return Ok(MenuChoice::Component(ComponentType::ALL[index - 1]));
                    }
                }
                match ComponentType::from_str_flexible(other) {
                    Ok(component) => return Ok(MenuChoice::Component(component)),
                    Err(_) => writeln!(prompter.out(), "Unknown choice '{}'", answer)?,
                }
            }
        }
    }
}

/// Collect the fields the form shows for `component`.
fn read_spec<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    component: ComponentType,
    defaults: &EstimateDefaults,
    rates: &RateTable,
) -> io::Result<ComponentSpec> {
    let mut spec = defaults.spec(component, rates);
    spec.label = prompter.text("Label", "")?;

    match component {
        ComponentType::FoundationWall
        | ComponentType::InteriorSlab
        | ComponentType::GarageSlab
        | ComponentType::ExteriorFlatwork => {
            let height_prompt = if component == ComponentType::FoundationWall {
                "Height (ft)"
            } else {
                "Width (ft)"
            };
            spec.length_ft = prompter.number("Length (ft)", 0.0)?;
            spec.height_ft = prompter.number(height_prompt, 0.0)?;
            spec.thickness_in = prompter.number("Thickness (in)", 0.0)?;
            spec.area_override_sf = prompter.optional_number("Area override (SF)")?;
            spec.rebar.spacing_in = prompter.optional_number("Rebar spacing override (in)")?;
            spec.include_xps = prompter.yes_no("Include XPS insulation?", false)?;
        }
        ComponentType::LinearFooting => {
            spec.length_ft = prompter.number("Length (ft)", 0.0)?;
            spec.height_ft = prompter.number("Width (ft)", 0.0)?;
            spec.thickness_in = prompter.number("Depth (in)", 0.0)?;
            let bars = prompter.count("Continuous bars", 2, 0)?;
            spec.rebar.bar_count = Some(bars);
        }
        ComponentType::SpreadFooting => {
            spec.length_ft = prompter.number("Length (ft)", 0.0)?;
            spec.height_ft = prompter.number("Width (ft)", 0.0)?;
            spec.thickness_in = prompter.number("Thickness (in)", 0.0)?;
            spec.quantity = prompter.count("Quantity", 1, 1)?;
        }
        ComponentType::FrenchDrain => {
            spec.length_ft = prompter.number("Length (ft)", 0.0)?;
        }
        ComponentType::XpsInsulation | ComponentType::VaporBarrier | ComponentType::FlatworkFinish => {
            spec.length_ft = prompter.number("Length (ft)", 0.0)?;
            spec.height_ft = prompter.number("Width / Height (ft)", 0.0)?;
            spec.area_override_sf = prompter.optional_number("Area override (SF)")?;
        }
    }

    if component.is_concrete() {
        spec.include_overage = prompter.yes_no(
            &format!("Apply {:.0}% overage?", (component.overage_factor() - 1.0) * 100.0),
            spec.include_overage,
        )?;
        spec.pricing.concrete_zone = prompter.select(
            "Concrete zone",
            &ConcreteZone::ALL,
            spec.pricing.concrete_zone,
            |s| ConcreteZone::from_str_flexible(s).ok(),
        )?;
    }
    if matches!(component, ComponentType::SpreadFooting) {
        // No rebar taken off for pads
    } else if component.is_concrete() {
        spec.rebar.size = prompter.select("Rebar size", &RebarSize::ALL, spec.rebar.size, |s| {
            RebarSize::from_str_flexible(s).ok()
        })?;
    }
    if component == ComponentType::XpsInsulation || spec.include_xps {
        spec.pricing.xps_r_value = prompter.select(
            "XPS R-value",
            &XpsRValue::ALL,
            spec.pricing.xps_r_value,
            |s| XpsRValue::from_str_flexible(s).ok(),
        )?;
    }
    if component == ComponentType::VaporBarrier {
        spec.pricing.vapor_type = prompter.select(
            "Vapor barrier",
            &VaporBarrierType::ALL,
            spec.pricing.vapor_type,
            |s| VaporBarrierType::from_str_flexible(s).ok(),
        )?;
    }
    if component == ComponentType::FlatworkFinish {
        let steps = rates.finish.rates.clone();
        let default = rates.finish_rate(spec.pricing.finish_rate_sf).unwrap_or(rates.default_finish_rate());
        spec.pricing.finish_rate_sf = prompter.select("Finish rate ($/SF)", &steps, default, |s| {
            s.trim_start_matches('$').parse::<f64>().ok().and_then(|v| rates.finish_rate(v).ok())
        })?;
    }
    spec.pricing.markup_pct = prompter.number("Markup (%)", spec.pricing.markup_pct)?;

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (ProjectLedger, String) {
        let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut ledger = ProjectLedger::new("Scripted", "Tester");
        run(&mut prompter, &mut ledger, &EstimateDefaults::default(), RateTable::builtin()).unwrap();
        let output = String::from_utf8(prompter.out().clone()).unwrap();
        (ledger, output)
    }

    #[test]
    fn test_wall_added_to_ledger() {
        // wall: label, L, H, T, no area, no spacing, no XPS, overage, zone, size, markup, add
        let script = "1\nW-1\n10\n8\n8\n\n\nn\ny\n2\n#4\n25\ny\nq\n";
        let (ledger, output) = run_script(script);
        assert_eq!(ledger.len(), 1);
        let record = &ledger.records()[0];
        assert_eq!(record.label, "W-1");
        assert!((record.concrete_cy - 2.17).abs() < 0.01);
        assert_eq!(record.rebar_lf, 172.0);
        assert!(output.contains("Foundation Wall (W-1)"));
        assert!(output.contains("Dataset now has 1 item(s)"));
    }

    #[test]
    fn test_negative_entry_clamped_and_declined() {
        // drain with a negative length, markup default, decline add
        let script = "drain\nFD-1\n-100\n\nn\nq\n";
        let (ledger, output) = run_script(script);
        assert!(ledger.is_empty());
        assert!(output.contains("French Drain (FD-1)"));
        assert!(output.contains("Drain rock:  -"));
    }

    #[test]
    fn test_spread_footing_and_summary() {
        // pad: label, L, W, T, qty, overage, zone, markup, add, then summary
        let script = "3\nF-1\n3\n3\n12\n4\ny\n\n\ny\ns\nq\n";
        let (ledger, output) = run_script(script);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].quantity, 4);
        assert!((ledger.records()[0].concrete_cy - 1.47).abs() < 0.01);
        assert!(output.contains("PROJECT TAKEOFF SUMMARY (1 items)"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (ledger, _) = run_script("");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unknown_menu_choice() {
        let (_, output) = run_script("roof\nq\n");
        assert!(output.contains("Unknown choice 'roof'"));
    }
}
