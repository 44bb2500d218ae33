//! Terminal rendering of menus, summaries and property tables.

use catalog_core::properties::PropertyValue;
use catalog_core::SelectorSession;

pub fn print_list(title: &str, items: &[String]) {
    println!("{} ({})", title, items.len());
    for (idx, item) in items.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, item);
    }
}

pub fn print_diagnostics(session: &SelectorSession) {
    for line in session.diagnostics() {
        println!("  {}", line);
    }
}

pub fn print_member(session: &SelectorSession) {
    let Some(summary) = session.material_summary() else {
        return;
    };

    println!("═══════════════════════════════════════");
    println!("  {}", summary.member);
    println!("═══════════════════════════════════════");
    println!();
    println!("Material Properties:");
    println!("  Grade:          {}", summary.grade);
    println!("  Material Type:  {}", summary.material_type);
    println!("  E:              {}", summary.modulus);
    println!("  Ix (tabulated): {} x10^6 mm^4", summary.ix_raw);

    let geometry = session.geometry_view();
    if !geometry.is_empty() {
        println!();
        println!("Geometric Properties:");
        for (column, value) in &geometry {
            println!("  {:<8} {}", column, value);
        }
    }

    if let Some(props) = session.derived() {
        println!();
        println!("Scaled Properties (mm, N):");
        for (key, value) in &props.values {
            match value {
                PropertyValue::Number(v) => println!("  {:<8} {:.4e}", key, v),
                PropertyValue::Unavailable => println!("  {:<8} N/A", key),
            }
        }
        for warning in &props.warnings {
            println!("  [WARN] {}", warning);
        }
    }
}

pub fn print_bindings(bindings: &[(String, f64)]) {
    for (name, value) in bindings {
        println!("  {} = {:.3e}", name, value);
    }
}
