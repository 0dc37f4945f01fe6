use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding config.yaml and downloaded models.
    /// Defaults to ~/.complaint-search
    #[clap(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DataArgs {
    /// Complaint CSV (overrides config data_path)
    #[clap(short, long)]
    pub data: Option<PathBuf>,

    /// Number of rows to load (overrides config sample_size)
    #[clap(short, long)]
    pub sample_size: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only include this company. Can be repeated
    #[clap(long = "company")]
    pub companies: Vec<String>,

    /// Only include this product. Can be repeated
    #[clap(long = "product")]
    pub products: Vec<String>,

    /// Earliest date received (YYYY-MM-DD), inclusive
    #[clap(long)]
    pub from: Option<NaiveDate>,

    /// Latest date received (YYYY-MM-DD), inclusive
    #[clap(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find complaints whose narratives are closest in meaning to a query
    Search {
        /// Free text query
        query: String,

        /// Number of results (overrides config default_top_k)
        #[clap(short = 'k', long)]
        top_k: Option<usize>,

        /// Skip complaints without a narrative
        #[clap(long, default_value = "false")]
        narratives_only: bool,

        #[command(flatten)]
        data_args: DataArgs,

        #[command(flatten)]
        filter_args: FilterArgs,
    },

    /// Print overview metrics for the (filtered) complaints
    Summary {
        #[command(flatten)]
        data_args: DataArgs,

        #[command(flatten)]
        filter_args: FilterArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let args = Args::try_parse_from([
            "complaint-search",
            "search",
            "charged twice",
            "-k",
            "3",
            "--company",
            "Acme",
            "--company",
            "Bolt",
            "--from",
            "2023-01-01",
        ])
        .unwrap();

        match args.command {
            Command::Search {
                query,
                top_k,
                filter_args,
                ..
            } => {
                assert_eq!(query, "charged twice");
                assert_eq!(top_k, Some(3));
                assert_eq!(filter_args.companies, vec!["Acme", "Bolt"]);
                assert_eq!(filter_args.from, NaiveDate::from_ymd_opt(2023, 1, 1));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_summary_with_global_config_dir() {
        let args = Args::try_parse_from([
            "complaint-search",
            "summary",
            "--config-dir",
            "/tmp/cs",
            "--data",
            "c.csv",
        ])
        .unwrap();

        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/cs")));
        assert!(matches!(args.command, Command::Summary { .. }));
    }
}
