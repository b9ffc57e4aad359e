use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sl_automation::MemoryApplication;
use sl_core::{CoreError, Setpoint};
use sl_flowsheet::{
    CaseSource, Entity, FlowsheetError, FlowsheetResult, MaterialStream, PropertyDispatch,
    ReadBatch, Simulation, UnknownProperties, WriteBatch,
};
use sl_registry::PropertyKind;
use tracing::debug;

#[derive(Parser)]
#[command(name = "sl-cli")]
#[command(about = "SimLink CLI - inspect and edit simulation cases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the case summary
    Info {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// List streams with their inlet/outlet role
    Streams {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// List unit operations and their connections
    Operations {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// Read material stream properties
    Get {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
        /// Material stream name
        stream: String,
        /// Properties as PROP or PROP=unit (e.g. pressure=kPa)
        #[arg(required = true)]
        properties: Vec<String>,
    },
    /// Write material stream properties
    Set {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
        /// Material stream name
        stream: String,
        /// Assignments as PROP=value or PROP=value@unit; value may be "empty"
        #[arg(required = true)]
        assignments: Vec<String>,
        /// Save the case file afterwards
        #[arg(long)]
        save: bool,
    },
}

fn main() -> FlowsheetResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { case_path } => cmd_info(&case_path),
        Commands::Streams { case_path } => cmd_streams(&case_path),
        Commands::Operations { case_path } => cmd_operations(&case_path),
        Commands::Get {
            case_path,
            stream,
            properties,
        } => cmd_get(&case_path, &stream, &properties),
        Commands::Set {
            case_path,
            stream,
            assignments,
            save,
        } => cmd_set(&case_path, &stream, &assignments, save),
    }
}

fn open(case_path: &Path) -> FlowsheetResult<Simulation<MemoryApplication>> {
    debug!(path = %case_path.display(), "opening case");
    Simulation::open(MemoryApplication::new(), CaseSource::File(case_path))
}

fn cmd_info(case_path: &Path) -> FlowsheetResult<()> {
    let sim = open(case_path)?;
    println!("{}", sim);
    println!("Operations: {}", sim.operations().len());
    println!(
        "Material streams: {} ({} inlet, {} outlet)",
        sim.material_streams().len(),
        sim.inlet_stream_names().len(),
        sim.outlet_stream_names().len()
    );
    println!("Energy streams: {}", sim.energy_streams().len());
    sim.close()?;
    Ok(())
}

fn cmd_streams(case_path: &Path) -> FlowsheetResult<()> {
    let sim = open(case_path)?;

    let mut names: Vec<&String> = sim.material_streams().keys().collect();
    names.sort();
    println!("Material streams:");
    for name in names {
        let role = match (
            sim.inlet_stream_names().contains(name),
            sim.outlet_stream_names().contains(name),
        ) {
            (true, true) => " [in/out]",
            (true, false) => " [in]",
            (false, true) => " [out]",
            (false, false) => "",
        };
        println!("  {}{}", name, role);
    }

    let mut names: Vec<&String> = sim.energy_streams().keys().collect();
    names.sort();
    println!("Energy streams:");
    for name in names {
        println!("  {}", name);
    }

    sim.close()?;
    Ok(())
}

fn cmd_operations(case_path: &Path) -> FlowsheetResult<()> {
    let sim = open(case_path)?;

    let mut ops: Vec<_> = sim.operations().values().collect();
    ops.sort_by(|a, b| a.name().cmp(b.name()));
    if ops.is_empty() {
        println!("No operations found in case");
    }
    for op in ops {
        let c = op.connections();
        println!(
            "  {} - {} ({}): {} -> {}",
            op.name(),
            op.kind(),
            op.type_tag(),
            c.upstream.join(", "),
            c.downstream.join(", ")
        );
    }

    sim.close()?;
    Ok(())
}

fn cmd_get(case_path: &Path, stream: &str, properties: &[String]) -> FlowsheetResult<()> {
    let sim = open(case_path)?;
    let batch = properties
        .iter()
        .map(|arg| parse_read(arg))
        .collect::<FlowsheetResult<ReadBatch>>()?;

    let report = sim.material_stream(stream)?.get_properties(&batch)?;
    for (label, unit) in batch.iter() {
        let Some(value) = report.values.get(label) else {
            continue;
        };
        let unit = unit.unwrap_or_else(|| default_unit(label));
        match value {
            Some(v) => println!("  {} = {} {}", label, v, unit),
            None => println!("  {} = empty", label),
        }
    }
    report_unknown(report.unknown.as_ref());

    sim.close()?;
    Ok(())
}

fn cmd_set(case_path: &Path, stream: &str, assignments: &[String], save: bool) -> FlowsheetResult<()> {
    let sim = open(case_path)?;
    let batch = assignments
        .iter()
        .map(|arg| parse_write(arg))
        .collect::<FlowsheetResult<WriteBatch>>()?;

    let report = sim.material_stream(stream)?.set_properties(&batch)?;
    for label in &report.applied {
        println!("✓ {} written", label);
    }
    report_unknown(report.unknown.as_ref());

    if save {
        sim.save()?;
        println!("✓ Saved {}", case_path.display());
    }

    sim.close()?;
    Ok(())
}

fn report_unknown(unknown: Option<&UnknownProperties>) {
    if let Some(unknown) = unknown {
        eprintln!("Warning: {}", unknown);
    }
}

fn default_unit(label: &str) -> &'static str {
    MaterialStream::registry()
        .resolve(label)
        .map_or("", |kind| kind.default_unit())
}

/// `PROP` or `PROP=unit`.
fn parse_read(arg: &str) -> FlowsheetResult<(String, Option<String>)> {
    let (label, unit) = match arg.split_once('=') {
        Some((label, unit)) => (label, Some(unit.trim().to_string())),
        None => (arg, None),
    };
    Ok((non_empty_label(label, arg)?, unit))
}

/// `PROP=value` or `PROP=value@unit`.
fn parse_write(arg: &str) -> FlowsheetResult<(String, sl_registry::WriteRequest)> {
    let (label, rhs) = arg.split_once('=').ok_or_else(|| invalid(arg, "expected PROP=value"))?;
    let (value, unit) = match rhs.split_once('@') {
        Some((value, unit)) => (value, Some(unit.trim().to_string())),
        None => (rhs, None),
    };
    let setpoint: Setpoint = value.parse()?;
    Ok((
        non_empty_label(label, arg)?,
        sl_registry::WriteRequest { setpoint, unit },
    ))
}

fn non_empty_label(label: &str, arg: &str) -> FlowsheetResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid(arg, "missing property name"));
    }
    Ok(label.to_string())
}

fn invalid(arg: &str, reason: &str) -> FlowsheetError {
    FlowsheetError::InvalidInput(CoreError::InvalidArg {
        what: format!("'{}': {}", arg, reason),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_argument_forms() {
        assert_eq!(parse_read("pressure").unwrap(), ("pressure".to_string(), None));
        assert_eq!(
            parse_read("pressure=kPa").unwrap(),
            ("pressure".to_string(), Some("kPa".to_string()))
        );
        assert!(parse_read("=kPa").is_err());
    }

    #[test]
    fn write_argument_forms() {
        let (label, req) = parse_write("MASSFLOW=2.5@t/h").unwrap();
        assert_eq!(label, "MASSFLOW");
        assert_eq!(req.setpoint, Setpoint::Value(2.5));
        assert_eq!(req.unit.as_deref(), Some("t/h"));

        let (_, req) = parse_write("temperature=Empty").unwrap();
        assert_eq!(req.setpoint, Setpoint::Empty);
        assert_eq!(req.unit, None);

        assert!(parse_write("pressure").is_err());
        assert!(parse_write("pressure=high").is_err());
    }

    #[test]
    fn default_units_come_from_the_registry() {
        assert_eq!(default_unit("massflow"), "kg/h");
        assert_eq!(default_unit("nope"), "");
    }
}
