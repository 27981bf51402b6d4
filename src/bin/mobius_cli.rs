#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("mobius_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use mobius_engine::geom::{Complex, PI_2, PI_4, Sl2c};
    use mobius_engine::mobius::{Transformation, TransformationManager, UniformBlock};
    use std::f64::consts::PI;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"mobius_cli (mobius-engine)

USAGE:
  mobius_cli list
  mobius_cli run <scenario|all> [options]

SCENARIOS:
  rotate_quarter_turn
  translate_meridian
  zoom_equator
  rotate_then_zoom
  drag_rotation_axis

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.snap to this dir (required for `all`)
  --snap <path>      Write the snapshot to a file (single scenario only)
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if snap_path.is_some() {
                return Err("use either --out-dir or --snap (not both)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, overwrite);
        }

        if scenario_name == "all" {
            for scenario in Scenario::ALL {
                let output = run_scenario(*scenario)?;
                print!("{}", output.snapshot);
                println!();
            }
            return Ok(());
        }

        let scenario = Scenario::from_str(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }
        eprintln!("{}: transformations={}", output.name, output.count);
        Ok(())
    }

    fn run_one_scenario_to_dir(scenario: Scenario, dir: &Path, overwrite: bool) -> Result<(), String> {
        let output = run_scenario(scenario)?;
        let path = dir.join(format!("{}.snap", output.name));
        write_text_file(&path, &output.snapshot, overwrite)?;
        eprintln!("wrote {}", path.display());
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_values_line(out: &mut String, prefix: &str, values: &[f64]) {
        out.push_str(prefix);
        for value in values.iter().copied() {
            out.push(' ');
            write_f64(out, value);
        }
        out.push('\n');
    }

    fn write_matrix(out: &mut String, prefix: &str, m: Sl2c) {
        for (label, entry) in [("a", m.a), ("b", m.b), ("c", m.c), ("d", m.d)] {
            write_values_line(out, &format!("{prefix}.{label}"), &entry.linear_array());
        }
    }

    fn write_uniforms(out: &mut String, blocks: &[UniformBlock]) {
        let _ = writeln!(out, "uniform_count {}", blocks.len());
        for block in blocks {
            write_values_line(out, &format!("uniform.{}", block.name), &block.values);
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        count: usize,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        let manager = scenario.build().map_err(|e| format!("{}: {e}", scenario.name()))?;

        let mut snapshot = String::new();
        let _ = writeln!(snapshot, "scenario {}", scenario.name());
        let _ = writeln!(snapshot, "transformation_count {}", manager.len());
        for t in manager.transformations() {
            let _ = writeln!(
                snapshot,
                "transformation {} {}{} selected={}",
                t.id(),
                t.kind(),
                t.ordinal(),
                t.is_selected()
            );
        }
        write_matrix(&mut snapshot, "net", manager.net_matrix());
        write_values_line(&mut snapshot, "render", &manager.net_matrix_for_render());
        write_uniforms(&mut snapshot, &manager.uniforms());

        Ok(ScenarioOutput {
            name: scenario.name(),
            count: manager.len(),
            snapshot,
        })
    }

    #[derive(Clone, Copy)]
    enum Scenario {
        RotateQuarterTurn,
        TranslateMeridian,
        ZoomEquator,
        RotateThenZoom,
        DragRotationAxis,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::RotateQuarterTurn,
            Scenario::TranslateMeridian,
            Scenario::ZoomEquator,
            Scenario::RotateThenZoom,
            Scenario::DragRotationAxis,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::RotateQuarterTurn => "rotate_quarter_turn",
                Scenario::TranslateMeridian => "translate_meridian",
                Scenario::ZoomEquator => "zoom_equator",
                Scenario::RotateThenZoom => "rotate_then_zoom",
                Scenario::DragRotationAxis => "drag_rotation_axis",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }

        fn build(self) -> mobius_engine::MobiusResult<TransformationManager> {
            let mut manager = TransformationManager::new();
            match self {
                Scenario::RotateQuarterTurn => {
                    manager.add_transformation(Transformation::rotate_around_axis(PI_2, PI_2, PI_2)?);
                }
                Scenario::TranslateMeridian => {
                    manager.add_transformation(Transformation::translate_along_axis(
                        Complex::new(PI, 0.3),
                        Complex::new(PI, PI - 0.3),
                        Complex::new(PI, PI_2),
                        Complex::new(PI, PI_2 + PI_4),
                    )?);
                }
                Scenario::ZoomEquator => {
                    manager.add_transformation(Transformation::zoom_in(
                        Complex::new(PI, PI_2),
                        Complex::new(2.0, 0.0),
                    )?);
                }
                Scenario::RotateThenZoom => {
                    manager.add_transformation(Transformation::rotate_around_axis(PI_2, PI_2, PI_2)?);
                    let zoom = manager.add_transformation(Transformation::zoom_in(
                        Complex::new(PI, PI_4),
                        Complex::new(1.5, 0.5),
                    )?);
                    manager.set_active(zoom)?;
                }
                Scenario::DragRotationAxis => {
                    let id = manager
                        .add_transformation(Transformation::rotate_around_axis(PI_2, PI_2, PI_4)?);
                    manager.set_active(id)?;
                    if manager.select(Complex::new(PI_2 + 0.05, PI_2)) {
                        manager.move_pointer(Complex::new(PI + 0.05, PI_4))?;
                    }
                    manager.release();
                }
            }
            Ok(manager)
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
