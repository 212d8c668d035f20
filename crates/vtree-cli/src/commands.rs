use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use tracing::debug;
use vtree_diff::{diff_with_config, DiffConfig, Patch, PatchMap, PropOp};
use vtree_host::{apply, render, InMemoryHost};
use vtree_types::VNode;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let output = match cli.command {
        Command::Diff(args) => cmd_diff(&args, format)?,
        Command::Patch(args) => cmd_patch(&args, format)?,
        Command::Check(args) => cmd_check(&args, format)?,
        Command::Render(args) => cmd_render(&args, format)?,
    };
    println!("{output}");
    Ok(())
}

fn cmd_diff(args: &DiffArgs, format: OutputFormat) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    let old = load_tree(&args.old)?;
    let new = load_tree(&args.new)?;
    let patches = diff_with_config(&old, &new, &config)?;

    match format {
        OutputFormat::Json => Ok(patches.to_json_pretty()?),
        OutputFormat::Text => Ok(describe_patches(&patches)),
    }
}

fn cmd_patch(args: &PatchArgs, format: OutputFormat) -> anyhow::Result<String> {
    let old = load_tree(&args.old)?;
    let raw = fs::read_to_string(&args.patches)
        .with_context(|| format!("reading {}", args.patches.display()))?;
    let patches = PatchMap::from_json(&raw)
        .with_context(|| format!("decoding patches from {}", args.patches.display()))?;

    let mut host = InMemoryHost::new();
    let root = render(&mut host, &old)?;
    let root = apply(&mut host, root, &patches)?;
    debug!(positions = patches.len(), "patched tree");

    match format {
        OutputFormat::Json => {
            let tree = host.to_vnode(root)?;
            Ok(serde_json::to_string_pretty(&tree)?)
        }
        OutputFormat::Text => Ok(host.to_markup(root)?),
    }
}

fn cmd_check(args: &DiffArgs, format: OutputFormat) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    let old = load_tree(&args.old)?;
    let new = load_tree(&args.new)?;
    let patches = diff_with_config(&old, &new, &config)?;
    let stats = patches.stats();

    let mut host = InMemoryHost::new();
    let root = render(&mut host, &old)?;
    let root = apply(&mut host, root, &patches)?;
    let actual = host.to_markup(root)?;

    let mut expected_host = InMemoryHost::new();
    let expected_root = render(&mut expected_host, &new)?;
    let expected = expected_host.to_markup(expected_root)?;

    if actual != expected {
        eprintln!("{}", markup_diff(&expected, &actual));
        bail!(
            "patched tree does not match {} ({stats})",
            args.new.display()
        );
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "ok": true,
            "stats": stats,
        }))?),
        OutputFormat::Text => Ok(format!("{} Round trip matches: {stats}", "✓".green().bold())),
    }
}

fn cmd_render(args: &RenderArgs, format: OutputFormat) -> anyhow::Result<String> {
    let tree = load_tree(&args.tree)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&tree)?),
        OutputFormat::Text => {
            let mut host = InMemoryHost::new();
            let root = render(&mut host, &tree)?;
            Ok(host.to_markup(root)?)
        }
    }
}

fn load_tree(path: &Path) -> anyhow::Result<VNode> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing tree from {}", path.display()))
}

/// Diff configuration from a TOML file, or the defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config from {}", path.display()))
}

fn describe_patches(patches: &PatchMap) -> String {
    if patches.is_empty() {
        return "No changes.".to_string();
    }
    let mut lines = vec![patches.stats().to_string().bold().to_string()];
    for (index, list) in patches.iter() {
        for patch in list {
            lines.push(format!(
                "  {} {}",
                format!("[{index}]").dimmed(),
                describe_patch(patch)
            ));
        }
    }
    lines.join("\n")
}

fn describe_patch(patch: &Patch) -> String {
    let kind = patch.kind().to_string();
    match patch {
        Patch::Insert { node } => format!("{} {}", kind.green(), summarize(node)),
        Patch::Remove => kind.red().to_string(),
        Patch::Replace { node } => format!("{} with {}", kind.yellow(), summarize(node)),
        Patch::Text { content } => format!("{} {content:?}", kind.cyan()),
        Patch::Props { ops } => {
            let ops: Vec<String> = ops
                .iter()
                .map(|op| match op {
                    PropOp::SetProp { key, value } => format!("{key}={value}"),
                    PropOp::RemoveProp { key } => format!("-{key}"),
                })
                .collect();
            format!("{} {}", kind.cyan(), ops.join(" "))
        }
        Patch::Order { moves } => format!(
            "{} {} removes, {} inserts",
            kind.magenta(),
            moves.removes.len(),
            moves.inserts.len()
        ),
    }
}

fn summarize(node: &VNode) -> String {
    match node {
        VNode::Text(t) => format!("{:?}", t.content),
        VNode::Element(el) => match el.key() {
            Some(key) => format!("<{}> key={key}", el.tag()),
            None => format!("<{}>", el.tag()),
        },
    }
}

/// Line diff of two markup strings, one element per line.
fn markup_diff(expected: &str, actual: &str) -> String {
    let expected = expected.replace("><", ">\n<");
    let actual = actual.replace("><", ">\n<");
    let diff = TextDiff::from_lines(&expected, &actual);

    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let line = change.value().trim_end();
        match change.tag() {
            ChangeTag::Delete => out.push_str(&format!("{}\n", format!("-{line}").red())),
            ChangeTag::Insert => out.push_str(&format!("{}\n", format!("+{line}").green())),
            ChangeTag::Equal => out.push_str(&format!(" {line}\n")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const OLD: &str = r#"{"tag":"ul","children":[
        {"tag":"li","key":1,"children":["a"]},
        {"tag":"li","key":2,"children":["b"]}
    ]}"#;
    const NEW: &str = r#"{"tag":"ul","children":[
        {"tag":"li","key":2,"children":["b"]},
        {"tag":"li","key":1,"children":["A"]}
    ]}"#;

    #[test]
    fn config_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, DiffConfig::default());
    }

    #[test]
    fn config_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "diff.toml",
            "check_duplicate_keys = false\nopaque_children_prop = \"ignore\"\n",
        );
        let config = load_config(Some(&path)).unwrap();
        assert!(!config.check_duplicate_keys);
        assert_eq!(config.opaque_children_prop.as_deref(), Some("ignore"));
        assert!(config.use_fingerprints);
    }

    #[test]
    fn bad_config_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "diff.toml", "check_duplicate_keys = \"maybe\"");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("diff.toml"));
    }

    #[test]
    fn diff_json_decodes_back() {
        let dir = TempDir::new().unwrap();
        let args = DiffArgs {
            old: write(&dir, "old.json", OLD),
            new: write(&dir, "new.json", NEW),
            config: None,
        };
        let json = cmd_diff(&args, OutputFormat::Json).unwrap();
        let patches = PatchMap::from_json(&json).unwrap();
        assert_eq!(patches.stats().orders, 1);
        assert_eq!(patches.stats().texts, 1);
    }

    #[test]
    fn identical_trees_report_no_changes() {
        let dir = TempDir::new().unwrap();
        let args = DiffArgs {
            old: write(&dir, "old.json", OLD),
            new: write(&dir, "new.json", OLD),
            config: None,
        };
        assert_eq!(cmd_diff(&args, OutputFormat::Text).unwrap(), "No changes.");
    }

    #[test]
    fn patch_command_applies_diff_output() {
        let dir = TempDir::new().unwrap();
        let old = write(&dir, "old.json", OLD);
        let new = write(&dir, "new.json", NEW);
        let json = cmd_diff(
            &DiffArgs { old: old.clone(), new, config: None },
            OutputFormat::Json,
        )
        .unwrap();
        let patches = write(&dir, "patches.json", &json);

        let markup = cmd_patch(&PatchArgs { old, patches }, OutputFormat::Text).unwrap();
        assert_eq!(markup, "<ul><li>b</li><li>A</li></ul>");
    }

    #[test]
    fn unknown_patch_kind_is_fatal() {
        let dir = TempDir::new().unwrap();
        let args = PatchArgs {
            old: write(&dir, "old.json", OLD),
            patches: write(&dir, "patches.json", r#"{"0": [{"kind": "SPLICE"}]}"#),
        };
        let err = cmd_patch(&args, OutputFormat::Text).unwrap_err();
        assert!(format!("{err:#}").contains("SPLICE"));
    }

    #[test]
    fn check_passes_for_real_diffs() {
        let dir = TempDir::new().unwrap();
        let args = DiffArgs {
            old: write(&dir, "old.json", OLD),
            new: write(&dir, "new.json", NEW),
            config: None,
        };
        let out = cmd_check(&args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["ok"], serde_json::Value::Bool(true));
        assert_eq!(value["stats"]["orders"], 1);
    }

    #[test]
    fn opaque_children_mismatch_fails_check() {
        let dir = TempDir::new().unwrap();
        let args = DiffArgs {
            old: write(&dir, "old.json", r#"{"tag":"div","props":{"ignore":true},"children":["a"]}"#),
            new: write(&dir, "new.json", r#"{"tag":"div","props":{"ignore":true},"children":["b"]}"#),
            config: Some(write(&dir, "diff.toml", "opaque_children_prop = \"ignore\"")),
        };
        let err = cmd_check(&args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn render_markup_and_json() {
        let dir = TempDir::new().unwrap();
        let args = RenderArgs { tree: write(&dir, "tree.json", OLD) };
        assert_eq!(
            cmd_render(&args, OutputFormat::Text).unwrap(),
            "<ul><li>a</li><li>b</li></ul>"
        );
        let json = cmd_render(&args, OutputFormat::Json).unwrap();
        let tree: VNode = serde_json::from_str(&json).unwrap();
        assert_eq!(tree.count(), 4);
    }

    #[test]
    fn markup_diff_marks_changed_lines() {
        colored::control::set_override(false);
        let out = markup_diff("<ul><li>a</li></ul>", "<ul><li>b</li></ul>");
        assert!(out.contains("-<li>a</li>"));
        assert!(out.contains("+<li>b</li>"));
        assert!(out.contains(" <ul>"));
    }

    #[test]
    fn missing_tree_file_is_reported() {
        let err = load_tree(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree.json"));
    }
}
