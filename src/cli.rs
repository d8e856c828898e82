use clap::Parser;
use std::path::PathBuf;

/// Resource-policy dependency reporter
#[derive(Parser, Debug)]
#[command(
    name = "rolecheck",
    version,
    about = "Report which resource policies still reference idle user roles",
    long_about = "Parses an exported appliance configuration tree (XML), cross-references \
                  a list of idle user roles against the resource policies configured in \
                  it, and writes one CSV report per policy group (web, file, SAM, \
                  terminal services, HTML5, VPN tunneling) showing which policies each \
                  idle role still depends on.",
    after_help = "\
EXAMPLES:
  rolecheck -r idle-roles.txt export.xml       Write all six reports to .
  rolecheck -r idle.txt -o out -g web export.xml
                                               Only the web report, into out/
  rolecheck -r idle.txt --json export.xml      Machine-readable run summary

EXIT CODES:
  0  All selected reports written
  2  Tool failure (unreadable or malformed export, bad role list, unknown
     group name, unwritable output directory)

REPORT GROUPS:
  web, file, sam, terminal-services, html5, vpn-tunnel

  Policies applying to all roles never count as per-role dependencies, and
  detail rules riding on a parent policy are excluded from parent-scoped
  categories. A group absent from the export still produces a header-only
  report so the report set stays stable across exports."
)]
pub struct Cli {
    /// Exported configuration XML file
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,

    /// File listing idle user roles, one per line
    #[arg(short, long, value_name = "FILE")]
    pub roles: PathBuf,

    /// Directory the CSV reports are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Restrict the run to these report groups (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub group: Vec<String>,

    /// Also show groups without any idle-role dependencies
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run summary as JSON (for scripting and CI)
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
