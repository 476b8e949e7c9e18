//! risk-tool: headless front end for the AML risk assessment core.
//!
//! Usage:
//!   risk-tool --client "Acme Ltd" --select sanctions=major_hits --select peps=major_pep
//!   risk-tool --json --data-dir ./data
//!   risk-tool --ipc-mode
//!   CDN_IMG_PREFIX=https://cdn.example.com risk-tool rewrite --public-dir public --out dist index.html app.css

use aml_risk_core::{
    asset_plugin::{is_stylesheet, CdnImagePrefixer},
    assessment::{Assessment, ClientInfo},
    command::SessionCommand,
    config::{CdnConfig, FactorCatalog},
    event::Notice,
    factor::RiskFactor,
    scoring::RiskScoreResult,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(serde::Serialize)]
struct UiState<'a> {
    client: &'a ClientInfo,
    edit_mode: bool,
    factors: &'a [RiskFactor],
    result: RiskScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("rewrite") {
        return run_rewrite(&args[2..]);
    }

    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let catalog = FactorCatalog::load_or_builtin(data_dir)?;

    if args.iter().any(|a| a == "--ipc-mode") {
        return run_ipc_loop(&mut Assessment::new(&catalog));
    }

    let mut client = ClientInfo::default();
    if let Some(name) = flag_value(&args, "--client") {
        client.name = name.to_string();
    }
    if let Some(date) = flag_value(&args, "--date") {
        client.assessment_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("--date expects YYYY-MM-DD, got '{date}'"))?;
    }
    if let Some(facility) = flag_value(&args, "--facility") {
        client.facility_amount = facility.to_string();
    }
    let mut assessment = Assessment::new(&catalog).with_client(client);

    for selection in flag_values(&args, "--select") {
        let (factor_id, value) = selection
            .split_once('=')
            .with_context(|| format!("--select expects ID=VALUE, got '{selection}'"))?;
        assessment.select_option(factor_id, value)?;
    }

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&ui_state(&assessment, None))?);
    } else {
        print_summary(&assessment);
    }
    Ok(())
}

fn run_ipc_loop(assessment: &mut Assessment) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: SessionCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, SessionCommand::Quit) {
            break;
        }

        let notice = match cmd.apply(assessment) {
            Ok(event) => event.and_then(|e| e.notice()),
            Err(e) => {
                log::warn!("Rejected command: {e}");
                Some(Notice::from(&e))
            }
        };

        let state = ui_state(assessment, notice);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn ui_state(assessment: &Assessment, notice: Option<Notice>) -> UiState<'_> {
    UiState {
        client: &assessment.client,
        edit_mode: assessment.is_edit_mode(),
        factors: assessment.factors(),
        result: assessment.score(),
        notice,
    }
}

fn print_summary(assessment: &Assessment) {
    let client = &assessment.client;
    println!("AML Risk Assessment");
    println!("  client:    {}", or_dash(&client.name));
    println!("  date:      {}", client.assessment_date);
    println!("  facility:  {}", or_dash(&client.facility_amount));
    println!();

    println!("=== RISK FACTORS ===");
    for f in assessment.factors() {
        let selected = f.selected_option().map_or("-", |o| o.label.as_str());
        println!(
            "  {:<52} {:<44} score {:>2}  weight {:.2}  weighted {:.2}",
            f.name,
            selected,
            f.score,
            f.weight,
            f.weighted_score()
        );
    }
    println!();

    let result = assessment.score();
    println!("=== RISK SUMMARY ===");
    println!("  total weighted score: {}", result.formatted_total());
    println!("  risk level:           {}", result.risk_level);
    println!("  risk percentage:      {}%", result.formatted_percentage());
    println!(
        "  due diligence:        {} ({})",
        result.due_diligence,
        result.due_diligence.description()
    );
}

fn run_rewrite(args: &[String]) -> Result<()> {
    let public_dir = flag_value(args, "--public-dir").unwrap_or("public");
    let out_dir = PathBuf::from(flag_value(args, "--out").unwrap_or("dist"));
    let inputs = positional(args, &["--public-dir", "--out"]);

    let config = CdnConfig::from_env();
    if !config.is_enabled() {
        log::info!("CDN_IMG_PREFIX not set; files are copied unchanged");
    }

    let targets = output_paths(&inputs, &out_dir)?;

    let mut plugin = CdnImagePrefixer::new(config)?;
    plugin.config_resolved(public_dir);
    plugin.build_start()?;

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Cannot create {}", out_dir.display()))?;

    let mut rewritten = 0usize;
    for (input, target) in inputs.iter().zip(&targets) {
        if rewrite_file(&plugin, Path::new(input), target)? {
            rewritten += 1;
        }
    }

    println!("=== REWRITE SUMMARY ===");
    println!("  public dir:     {public_dir}");
    println!("  known images:   {}", plugin.rewriter().images().file_count());
    println!("  files:          {}", inputs.len());
    println!("  rewritten:      {rewritten}");
    Ok(())
}

/// One output path per input, flattened into `out_dir` by file name.
/// Two inputs sharing a file name would overwrite each other, so that
/// is an error.
fn output_paths(inputs: &[&str], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen = HashMap::new();
    let mut targets = Vec::with_capacity(inputs.len());
    for &input in inputs {
        let file_name = Path::new(input)
            .file_name()
            .with_context(|| format!("Not a file: {input}"))?;
        if let Some(first) = seen.insert(file_name, input) {
            anyhow::bail!(
                "{first} and {input} would both be written to {}",
                out_dir.join(file_name).display()
            );
        }
        targets.push(out_dir.join(file_name));
    }
    Ok(targets)
}

/// Returns true when the written output differs from the input.
fn rewrite_file(plugin: &CdnImagePrefixer, input: &Path, target: &Path) -> Result<bool> {
    let id = input.to_string_lossy();

    let is_html = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));

    if !is_html && !is_stylesheet(&id) {
        fs::copy(input, target)
            .with_context(|| format!("Cannot copy {} to {}", input.display(), target.display()))?;
        return Ok(false);
    }

    let code = fs::read_to_string(input)
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let out = if is_html {
        plugin.transform_index_html(&code)
    } else {
        plugin.transform(&code, &id).unwrap_or_else(|| code.clone())
    };

    fs::write(target, &out).with_context(|| format!("Cannot write {}", target.display()))?;
    log::debug!("rewrite: {} -> {}", input.display(), target.display());
    Ok(out != code)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

/// Arguments that are neither flags nor the value of a valued flag.
fn positional<'a>(args: &'a [String], valued_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if valued_flags.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_flattened_by_file_name() {
        let inputs = ["public/index.html", "src/styles/app.css"];
        let targets = output_paths(&inputs, Path::new("dist")).unwrap();
        assert_eq!(
            targets,
            vec![PathBuf::from("dist/index.html"), PathBuf::from("dist/app.css")]
        );
    }

    #[test]
    fn inputs_sharing_a_file_name_are_rejected() {
        let err = output_paths(&["a/theme.css", "b/theme.css"], Path::new("dist")).unwrap_err();
        assert!(err.to_string().contains("a/theme.css and b/theme.css"), "{err}");
    }

    #[test]
    fn positional_skips_flag_values() {
        let args: Vec<String> = [
            "--public-dir", "public", "index.html", "--out", "dist", "app.css",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(
            positional(&args, &["--public-dir", "--out"]),
            vec!["index.html", "app.css"]
        );
    }
}
