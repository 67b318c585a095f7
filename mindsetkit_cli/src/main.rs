use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mindsetkit_client::controllers::auth::AuthForm;
use mindsetkit_client::controllers::practice_search::{PracticeSearch, TagGroup};
use mindsetkit_client::controllers::search::ContentSearch;
use mindsetkit_client::controllers::survey_entry::parse_phase_code;
use mindsetkit_client::upload::UploadFile;
use mindsetkit_client::{telemetry, ClientConfig, ContentItem, ContentKind, MskApi, Params};
use serde_json::json;

#[derive(Parser)]
#[command(author, version, about = "Command-line client for the Mindset Kit API")]
struct Args {
    /// Server origin; overrides the config file and MSK_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print raw JSON instead of one line per record
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an email and password
    Login { email: String, password: String },
    /// Free-text search across themes, lessons and practices
    Search {
        query: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long = "subject")]
        subjects: Vec<String>,
        /// Lowest grade, 0 (kindergarten) to 13 (postsecondary)
        #[arg(long, default_value_t = 0)]
        min_grade: u8,
        #[arg(long, default_value_t = 13)]
        max_grade: u8,
        /// Only one kind: theme, lesson or practice
        #[arg(long = "type")]
        content_type: Option<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List practices, optionally filtered by tag
    Practices {
        #[arg(long = "mindset")]
        mindset_tags: Vec<String>,
        #[arg(long = "tag")]
        practice_tags: Vec<String>,
        #[arg(long = "subject")]
        subjects: Vec<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Attach files to a practice, one after another
    Upload {
        practice: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Look up the survey behind an entry code such as "epic shark 1"
    SurveyCode { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::discover()?,
    };
    telemetry::init_tracing(config.debug);
    if let Some(base_url) = &args.base_url {
        config = ClientConfig {
            base_url: ClientConfig::new(base_url.as_str())?.base_url,
            ..config
        };
    }
    tracing::debug!(base_url = %config.base_url, "using server");
    let api = MskApi::new(config).context("failed to build HTTP client")?;

    match args.command {
        Command::Login { email, password } => login(api, email, password).await,
        Command::Search {
            query,
            tags,
            subjects,
            min_grade,
            max_grade,
            content_type,
            pages,
        } => {
            let mut search = ContentSearch::new(api);
            let mut filters = Params::new();
            filters.insert("q".into(), json!(query));
            filters.insert("tags".into(), json!(tags));
            filters.insert("subjects".into(), json!(subjects));
            search.apply_query(&filters);
            search.set_grades(min_grade, max_grade);
            if let Some(name) = content_type {
                let kind = match name.as_str() {
                    "theme" => ContentKind::Theme,
                    "lesson" => ContentKind::Lesson,
                    "practice" => ContentKind::Practice,
                    other => bail!("unknown content type {other:?}"),
                };
                search.set_content_type(Some(kind));
            }
            search.update_search().await?;
            for _ in 1..pages {
                if !search.should_paginate() {
                    break;
                }
                search.load_more().await?;
            }
            print_items(search.items(), args.json)
        }
        Command::Practices {
            mindset_tags,
            practice_tags,
            subjects,
            pages,
        } => {
            let mut search = PracticeSearch::new(api);
            for (group, names) in [
                (TagGroup::Mindset, mindset_tags),
                (TagGroup::Practice, practice_tags),
                (TagGroup::Subjects, subjects),
            ] {
                for name in names {
                    if search.toggle_filter(group, &name).is_none() {
                        bail!("unknown {} tag {name:?}", group.param());
                    }
                }
            }
            search.update_search().await?;
            for _ in 1..pages {
                if !search.should_paginate() {
                    break;
                }
                search.load_more().await?;
            }
            print_items(search.practices(), args.json)
        }
        Command::Upload { practice, files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(
                    UploadFile::from_path(path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?,
                );
            }
            let updated = api.practices().upload_files(&practice, &uploads).await?;
            match updated {
                Some(practice) => {
                    for file in practice.files() {
                        println!("{}", file.filename.unwrap_or(file.gs_object_name));
                    }
                }
                None => println!("nothing to upload"),
            }
            Ok(())
        }
        Command::SurveyCode { code } => {
            let Some((entry_code, phase)) = parse_phase_code(&code) else {
                bail!("{code:?} is not two words followed by a phase digit");
            };
            let Some(survey) = api.surveys().fetch_by_code(&entry_code).await? else {
                bail!("no survey uses the code {entry_code:?}");
            };
            let key = survey
                .public_keys
                .get((phase as usize).wrapping_sub(1))
                .with_context(|| {
                    format!(
                        "phase {phase} is outside 1..={} for this survey",
                        survey.public_keys.len()
                    )
                })?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&survey)?);
            } else {
                println!(
                    "{} ({:?}) group {:?} phase {phase} key {key}",
                    survey.url_name, survey.auth_type, survey.group_name
                );
            }
            Ok(())
        }
    }
}

async fn login(api: MskApi, email: String, password: String) -> Result<()> {
    let mut form = AuthForm::new(api);
    form.email = email;
    form.password = password;
    form.login().await?;
    if !form.error_message.is_empty() {
        bail!("{}", form.error_message);
    }
    match &form.user {
        Some(user) => println!("signed in as {} <{}>", user.full_name(), user.uid),
        None => bail!("login did not return a user"),
    }
    Ok(())
}

fn print_items(items: &[ContentItem], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    for item in items {
        println!("{}\t{}", item.uid, item.name);
    }
    Ok(())
}
