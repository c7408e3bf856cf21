mod logging;

use blueark_expr::parse_rendered;
use blueark_lp::{
    CompileConfig, DegenerateRows, Matrix, Solution, SolverFiles, build_bounds,
    build_turbine_table, parse_solution, read_solution_lines, split_descriptors,
    write_solver_inputs,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compile water network constraints into solver input files"
)]
struct Cli {
    /// Log filter (overrides BLUEARK_TRACE)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build matrix, bounds and variables files for one step
    Compile(CompileArgs),
    /// Parse and re-render canonical constraint lines
    Check(CheckArgs),
    /// Read a solver output file
    Solution(SolutionArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Equation list: rendered constraints and `<name> <= <value>` bounds
    #[arg(long)]
    equations: PathBuf,

    /// Turbine descriptors (`<value>x<id>`), one per line
    #[arg(long)]
    turbines: Option<PathBuf>,

    /// JSON compile configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured output directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep rows without variables instead of failing
    #[arg(long)]
    keep_degenerate: bool,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Rendered constraint lines
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct SolutionArgs {
    /// Solver output file
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct CompileSummary {
    rows: usize,
    columns: Vec<String>,
    bounded: usize,
    turbines: usize,
    matrix_file: String,
    bounds_file: String,
    variables_file: String,
    duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct CheckRow {
    line: usize,
    canonical: String,
    variables: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ValueRow {
    name: String,
    value: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level).map_err(|message| boxed_input_error(&message))?;
    match cli.command {
        Command::Compile(args) => compile_command(args),
        Command::Check(args) => check_command(args),
        Command::Solution(args) => solution_command(args),
    }
}

fn compile_command(args: CompileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    let summary = compile_step(&args.equations, args.turbines.as_deref(), &config)?;

    match args.format {
        OutputFormat::Table => {
            println!("{:<10} {:>8}", "rows", summary.rows);
            println!("{:<10} {:>8}", "columns", summary.columns.len());
            println!("{:<10} {:>8}", "bounded", summary.bounded);
            println!("{:<10} {:>8}", "turbines", summary.turbines);
            println!("{:<10} {}", "matrix", summary.matrix_file);
            println!("{:<10} {}", "bounds", summary.bounds_file);
            println!("{:<10} {}", "variables", summary.variables_file);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        OutputFormat::Ndjson => {
            println!("{}", serde_json::to_string(&summary)?);
            Ok(())
        }
    }
}

fn check_command(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lines = read_input_lines(&args.input)?;
    let rows = check_lines(&lines)?;

    match args.format {
        OutputFormat::Table => {
            println!("{:>6} {:>9}  {}", "line", "variables", "canonical");
            for row in &rows {
                println!("{:>6} {:>9}  {}", row.line, row.variables, row.canonical);
            }
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        OutputFormat::Ndjson => {
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
            Ok(())
        }
    }
}

fn solution_command(args: SolutionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lines = read_solution_lines(&args.input)?;
    let solution = parse_solution(&lines)?;

    match args.format {
        OutputFormat::Table => {
            println!("{:<24} {:>16}", "objective", solution.objective_value());
            for row in value_rows(&solution) {
                println!("{:<24} {:>16}", row.name, row.value);
            }
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&solution)?);
            Ok(())
        }
        OutputFormat::Ndjson => {
            for row in value_rows(&solution) {
                println!("{}", serde_json::to_string(&row)?);
            }
            Ok(())
        }
    }
}

fn resolve_config(args: &CompileArgs) -> Result<CompileConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => CompileConfig::from_json_file(path)?,
        None => CompileConfig::new(),
    };
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if args.keep_degenerate {
        config = config.with_degenerate_rows(DegenerateRows::Keep);
    }
    Ok(config)
}

fn compile_step(
    equations: &Path,
    turbines: Option<&Path>,
    config: &CompileConfig,
) -> Result<CompileSummary, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let lines = read_input_lines(equations)?;
    if lines.is_empty() {
        return Err(boxed_input_error(&format!(
            "{} contains no equations",
            equations.display()
        )));
    }
    let (constraints, bound_lines) = split_descriptors(&lines);
    let turbine_lines = match turbines {
        Some(path) => read_input_lines(path)?,
        None => Vec::new(),
    };

    let matrix = Matrix::from_rendered(&constraints, config.degenerate_rows)?;
    let bounds = build_bounds(&bound_lines, matrix.registry())?;
    let turbine_table = build_turbine_table(&turbine_lines, matrix.registry())?;
    let files = write_solver_inputs(config, &matrix, &bounds, &turbine_table)?;

    Ok(summarize(&matrix, bound_lines.len(), turbine_lines.len(), &files, started))
}

fn summarize(
    matrix: &Matrix,
    bounded: usize,
    turbines: usize,
    files: &SolverFiles,
    started: Instant,
) -> CompileSummary {
    CompileSummary {
        rows: matrix.num_rows(),
        columns: matrix.columns(),
        bounded,
        turbines,
        matrix_file: files.matrix.display().to_string(),
        bounds_file: files.bounds.display().to_string(),
        variables_file: files.variables.display().to_string(),
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

fn check_lines(lines: &[String]) -> Result<Vec<CheckRow>, Box<dyn std::error::Error>> {
    let mut rows = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let constraint = parse_rendered(line)?;
        rows.push(CheckRow {
            line: index + 1,
            canonical: constraint.to_string(),
            variables: constraint.terms().len(),
        });
    }
    Ok(rows)
}

fn value_rows(solution: &Solution) -> Vec<ValueRow> {
    solution
        .values()
        .iter()
        .map(|(name, value)| ValueRow {
            name: name.clone(),
            value: *value,
        })
        .collect()
}

/// Non-empty lines, trimmed, with `#` comment lines dropped.
fn read_input_lines(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| boxed_input_error(&format!("{}: {err}", path.display())))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn compile_step_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let equations = write(
            dir.path(),
            "equations.txt",
            "# tank balance\n1.0x1 + -1.0x2 = -40.0\n\n-1.0x2 + 1.0x3 <= -5.0\nx1 <= 100\n",
        );
        let turbines = write(dir.path(), "turbines.txt", "1.5x2\n");
        let config = CompileConfig::new().with_data_dir(dir.path().join("data"));

        let summary = compile_step(&equations, Some(&turbines), &config).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns, vec!["x1", "x2", "x3"]);
        assert_eq!(summary.bounded, 1);
        assert_eq!(summary.turbines, 1);

        let matrix = fs::read_to_string(config.matrix_path()).unwrap();
        assert_eq!(
            matrix,
            "1.0 -1.0 0.0 0 -40.0\n0.0 -1.0 1.0 1 -5.0\n# x1 x2 x3\n"
        );
        let variables = fs::read_to_string(config.variables_path()).unwrap();
        assert_eq!(
            variables,
            "3 2\n0.0 100.0 x1 0.0\n0.0 -1.0 x2 1.5\n0.0 -1.0 x3 0.0\n"
        );
    }

    #[test]
    fn compile_step_rejects_empty_equation_list() {
        let dir = tempfile::tempdir().unwrap();
        let equations = write(dir.path(), "equations.txt", "# nothing\n\n");
        let config = CompileConfig::new().with_data_dir(dir.path());

        let err = compile_step(&equations, None, &config).unwrap_err();
        assert!(err.to_string().contains("contains no equations"));
    }

    #[test]
    fn compile_step_reports_degenerate_row() {
        let dir = tempfile::tempdir().unwrap();
        let equations = write(dir.path(), "equations.txt", "1.0x = 2.0\n0.0 = -1.0\n");
        let config = CompileConfig::new().with_data_dir(dir.path());

        let err = compile_step(&equations, None, &config).unwrap_err();
        assert!(err.to_string().contains("LP_DEGENERATE_CONSTRAINT"));

        let keeping = config.with_degenerate_rows(DegenerateRows::Keep);
        let summary = compile_step(&equations, None, &keeping).unwrap();
        assert_eq!(summary.rows, 2);
    }

    #[test]
    fn check_lines_re_renders_and_counts_variables() {
        let lines = vec![
            "1.0x + -1.0y + -1.0z <= 10.0".to_string(),
            "2.0a + 3.0a = 1".to_string(),
        ];
        let rows = check_lines(&lines).unwrap();
        assert_eq!(rows[0].canonical, "1.0x + -1.0y + -1.0z <= 10.0");
        assert_eq!(rows[0].variables, 3);
        assert_eq!(rows[1].canonical, "5.0a = 1.0");
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn check_lines_points_at_bad_input() {
        let lines = vec!["x >= 1".to_string()];
        let err = check_lines(&lines).unwrap_err();
        assert!(err.to_string().contains("EXPR_UNPARSABLE_RENDERED"));
    }

    #[test]
    fn value_rows_keep_solver_order() {
        let solution = parse_solution(&["12.5", "b,2", "a,1"]).unwrap();
        let rows = value_rows(&solution);
        assert_eq!(rows[0].name, "b");
        assert_eq!(rows[1].value, 1.0);
    }

    #[test]
    fn resolve_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write(
            dir.path(),
            "config.json",
            r#"{"data_dir": "from-file", "matrix_file_name": "m.dat"}"#,
        );
        let args = CompileArgs {
            equations: PathBuf::from("unused"),
            turbines: None,
            config: Some(config_path),
            data_dir: Some(PathBuf::from("override")),
            keep_degenerate: true,
            format: OutputFormat::Json,
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("override"));
        assert_eq!(config.matrix_file_name, "m.dat");
        assert_eq!(config.degenerate_rows, DegenerateRows::Keep);
    }

    #[test]
    fn cli_parses_compile_flags() {
        let cli = Cli::try_parse_from([
            "blueark",
            "compile",
            "--equations",
            "eq.txt",
            "--keep-degenerate",
            "--format",
            "ndjson",
        ])
        .unwrap();
        match cli.command {
            Command::Compile(args) => {
                assert_eq!(args.equations, PathBuf::from("eq.txt"));
                assert!(args.keep_degenerate);
                assert_eq!(args.format, OutputFormat::Ndjson);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
