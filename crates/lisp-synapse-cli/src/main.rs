use anyhow::{Context, Result};
use lisp_synapse_config::Config;
use lisp_synapse_engine::{Buffer, ModeConfig, reindent_all};
use std::{env, path::PathBuf, process};

fn usage() -> ! {
    eprintln!("usage: lisp-synapse-cli [--check] [--config PATH] FILE...");
    eprintln!();
    eprintln!("Reindents Lisp source files in place.");
    eprintln!("  --check        report lines whose indentation is off, change nothing");
    eprintln!("  --config PATH  read overrides from PATH instead of the default location");
    process::exit(2);
}

fn main() -> Result<()> {
    let mut check = false;
    let mut config_path: Option<PathBuf> = None;
    let mut paths: Vec<PathBuf> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--check" => check = true,
            "--config" => match args.next() {
                Some(p) => config_path = Some(PathBuf::from(p)),
                None => usage(),
            },
            "--help" | "-h" => usage(),
            _ if arg.starts_with('-') => usage(),
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    if paths.is_empty() {
        usage();
    }

    let config = match &config_path {
        Some(p) => Config::load_from_path(p)?,
        None => Config::load()?,
    };
    let (mode, tab_width) = build_mode(config);

    let mut off_lines = 0;
    for path in &paths {
        off_lines += process_file(path, &mode, tab_width, check)?;
    }
    if check && off_lines > 0 {
        eprintln!("{off_lines} line(s) need reindenting");
        process::exit(1);
    }
    Ok(())
}

fn build_mode(config: Option<Config>) -> (ModeConfig, Option<usize>) {
    let mut mode = ModeConfig::default();
    let mut tab_width = None;
    if let Some(cfg) = config {
        if let Some(unit) = cfg.indent_unit {
            mode.indent_unit = unit;
        }
        mode.special_forms.extend(cfg.special_forms);
        tab_width = cfg.tab_width;
    }
    (mode, tab_width)
}

/// Reindents one file. Returns the number of lines that were (or, in check
/// mode, would be) changed.
fn process_file(
    path: &PathBuf,
    mode: &ModeConfig,
    tab_width: Option<usize>,
    check: bool,
) -> Result<usize> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut buf =
        Buffer::from_bytes(&bytes).with_context(|| format!("not UTF-8: {}", path.display()))?;
    if let Some(width) = tab_width {
        buf.set_tab_width(width);
    }

    let original = buf.clone();
    reindent_all(&mut buf, mode);
    if buf.text() == original.text() {
        return Ok(0);
    }

    let mut changed = 0;
    for i in 0..buf.line_count() {
        let before = original.line(i).map(|l| l.text());
        let after = buf.line(i).map(|l| l.text());
        if before != after {
            changed += 1;
            if check {
                println!(
                    "{}:{}: indentation {}, want {}",
                    path.display(),
                    i + 1,
                    original.indentation_of(i),
                    buf.indentation_of(i)
                );
            }
        }
    }

    if !check {
        std::fs::write(path, buf.text())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_then_check_agrees() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.lisp");
        std::fs::write(&path, "(when x\ny)\n").unwrap();

        let mode = ModeConfig::default();
        let changed = process_file(&path, &mode, None, false).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "(when x\n  y)\n"
        );

        // a freshly rewritten file passes the check
        let off = process_file(&path, &mode, None, true).unwrap();
        assert_eq!(off, 0);
    }

    #[test]
    fn check_mode_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.lisp");
        std::fs::write(&path, "(when x\ny)\n").unwrap();

        let mode = ModeConfig::default();
        let off = process_file(&path, &mode, None, true).unwrap();
        assert_eq!(off, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "(when x\ny)\n");
    }

    #[test]
    fn config_overrides_reach_the_mode() {
        let config = Config {
            indent_unit: Some(4),
            special_forms: vec!["my-macro".to_owned()],
            tab_width: Some(4),
        };
        let (mode, tab_width) = build_mode(Some(config));
        assert_eq!(mode.indent_unit, 4);
        assert!(mode.special_forms.contains("my-macro"));
        assert_eq!(tab_width, Some(4));
    }
}
