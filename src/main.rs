use clap::Parser;
use tracing_subscriber::EnvFilter;

use complaint_search::{
    complaints::Record,
    config::Config,
    pipeline,
    semantic::{ComplaintSearcher, ResultRow, SearchResult},
    summary::{Summary, SummaryFilter},
};

mod cli;
use cli::{DataArgs, FilterArgs};

impl From<FilterArgs> for SummaryFilter {
    fn from(args: FilterArgs) -> Self {
        SummaryFilter {
            companies: args.companies,
            products: args.products,
            from: args.from,
            to: args.to,
        }
    }
}

fn load_records(config: &Config, data_args: DataArgs) -> anyhow::Result<Vec<Record>> {
    let path = data_args.data.unwrap_or_else(|| config.data_path.clone());
    let sample_size = data_args.sample_size.or(config.sample_size);

    let raw = pipeline::load_complaints(&path, sample_size)?;
    Ok(pipeline::clean_complaints(&raw))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };
    let config = Config::load_with(&config_dir)?;

    match args.command {
        cli::Command::Summary {
            data_args,
            filter_args,
        } => {
            let filter: SummaryFilter = filter_args.into();
            let records = load_records(&config, data_args)?;
            let summary = Summary::build(&records, &filter);

            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }

        cli::Command::Search {
            query,
            top_k,
            narratives_only,
            data_args,
            filter_args,
        } => {
            let filter: SummaryFilter = filter_args.into();
            let records: Vec<Record> = load_records(&config, data_args)?
                .into_iter()
                .filter(|r| filter.matches(r))
                .filter(|r| !narratives_only || r.has_narrative())
                .collect();

            let top_k = top_k.unwrap_or(config.semantic_search.default_top_k);
            let _span = tracing::info_span!("search", top_k, candidates = records.len()).entered();

            let mut searcher = ComplaintSearcher::from_config(&config.semantic_search)?;
            searcher.prepare(records)?;

            let results = searcher.search(&query, top_k)?;
            tracing::info!(results = results.len(), "search complete");

            let rows: Vec<ResultRow> = results.iter().map(SearchResult::row).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
    }
}
