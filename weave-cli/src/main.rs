//! Weave command line
//!
//! Inspect, reformat and merge tag-soup markup files.
//!
//! - `weave tree page.html`          # Print the element tree
//! - `weave tree --json page.html`   # Dump the raw arena
//! - `weave format page.html`        # Parse and reserialize
//! - `weave merge tpl.html logic.html` # Merge logic into template

mod error;
mod view;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weave_common::warning::warn_once;
use weave_dom::Tree;
use weave_html::{ParseIssue, TreeBuilder};

use error::CliError;

/// Weave: a forgiving markup parser with tree merging
#[derive(Parser, Debug)]
#[command(name = "weave")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show the parsed tree
    weave tree index.html

    # Dump the node arena as JSON
    weave tree --json index.html

    # Round-trip a file through the parser (use - for stdin)
    cat index.html | weave format -

    # Merge a logic file into a template
    weave merge template.html logic.html
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored tree output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log parser activity (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the element tree and any parse issues
    Tree {
        /// Markup file, or - for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dump the node arena as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Parse a file and print it back out
    Format {
        /// Markup file, or - for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Merge the root element of LOGIC into the root element of TEMPLATE
    Merge {
        /// Template markup file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Logic markup file whose root attributes, text and children win
        #[arg(value_name = "LOGIC")]
        logic: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tree { file, json } => {
            let (tree, issues) = TreeBuilder::new(&read_input(&file)?).run_with_issues();
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
                return Ok(());
            }
            println!("=== Tree ===");
            print!("{}", view::render_tree(&tree, !cli.no_color));
            if !issues.is_empty() {
                println!("\n=== Parse Issues ===");
                for issue in &issues {
                    println!("  - {issue}");
                }
            }
        }
        Command::Format { file } => {
            let (tree, issues) = TreeBuilder::new(&read_input(&file)?).run_with_issues();
            let _ = warn_issues(&file, &issues);
            print!("{tree}");
        }
        Command::Merge { template, logic } => {
            let merged = merge_files(&template, &logic)?;
            print!("{merged}");
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `-v` forces `debug`; otherwise `RUST_LOG` applies, defaulting to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Warn once per distinct anomaly; a table with a stray `</td>` per row
/// yields one warning. Returns how many warnings were emitted.
fn warn_issues(path: &Path, issues: &[ParseIssue]) -> usize {
    let component = path.display().to_string();
    issues
        .iter()
        .filter(|issue| warn_once(&component, &format!("{} `{}`", issue.kind, issue.detail)))
        .count()
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let result = if path.as_os_str() == "-" {
        io::read_to_string(io::stdin())
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn merge_files(template_path: &Path, logic_path: &Path) -> Result<Tree, CliError> {
    let mut template = weave_html::parse(&read_input(template_path)?);
    let logic = weave_html::parse(&read_input(logic_path)?);
    merge_trees(&mut template, template_path, &logic, logic_path)?;
    Ok(template)
}

/// Check that both sides have a tagged root and merge `logic` into `template`.
fn merge_trees(
    template: &mut Tree,
    template_path: &Path,
    logic: &Tree,
    logic_path: &Path,
) -> Result<(), CliError> {
    let template_tag = root_tag(template, template_path)?;
    let logic_tag = root_tag(logic, logic_path)?;
    if template.merge(logic) {
        tracing::debug!(tag = %template_tag, nodes = template.len(), "merged");
        Ok(())
    } else {
        Err(CliError::RootMismatch {
            template: template_tag,
            logic: logic_tag,
        })
    }
}

fn root_tag(tree: &Tree, path: &Path) -> Result<String, CliError> {
    tree.root_element()
        .map(|id| tree[id].tag.clone())
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| CliError::MissingRoot {
            path: path.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_global_flags() {
        let cli = Cli::parse_from(["weave", "tree", "--json", "a.html", "--no-color"]);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Tree { json: true, .. }));

        let cli = Cli::parse_from(["weave", "-v", "merge", "t.html", "l.html"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Merge { .. }));
    }

    #[test]
    fn merge_trees_checks_root_tags() {
        let path = Path::new("x.html");
        let mut template = weave_html::parse("<div class=\"a\"><p>1</p></div>");
        let logic = weave_html::parse("<div id=\"b\"></div>");
        merge_trees(&mut template, path, &logic, path).unwrap();
        assert_eq!(
            template.to_string(),
            "<div class=\"a\" id=\"b\"><p>1</p></div>"
        );

        let other = weave_html::parse("<span>s</span>");
        let err = merge_trees(&mut template, path, &other, path).unwrap_err();
        assert!(matches!(err, CliError::RootMismatch { .. }));
    }

    #[test]
    fn merge_trees_accepts_doctype_prefixed_files() {
        let path = Path::new("page.html");
        let mut template = weave_html::parse("<!DOCTYPE html>\n<html><body>x</body></html>");
        let logic = weave_html::parse("\n<html lang=\"en\"></html>");
        merge_trees(&mut template, path, &logic, path).unwrap();
        assert_eq!(
            template.to_string(),
            "<!DOCTYPE html>\n<html lang=\"en\"><body>x</body></html>"
        );
    }

    #[test]
    fn bare_text_has_no_root_tag() {
        let path = Path::new("t.html");
        let err = root_tag(&weave_html::parse("just text"), path).unwrap_err();
        assert!(matches!(err, CliError::MissingRoot { .. }));
        assert!(root_tag(&Tree::new(), path).is_err());
    }

    #[test]
    fn repeated_issues_warn_once() {
        let path = Path::new("rows.html");
        let (_, issues) = TreeBuilder::new("<tr>a</td><tr>b</td><p>c</em>").run_with_issues();
        assert_eq!(issues.len(), 3);
        assert_eq!(warn_issues(path, &issues), 2);
        assert_eq!(warn_issues(path, &issues), 0);
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = read_input(Path::new("/nonexistent/weave/input.html")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
