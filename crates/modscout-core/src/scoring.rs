//! Keyword and weight based relevance scoring.
//!
//! Every function here is pure: the same `(query, record)` pair always yields
//! the same score. Keyword tables are process-wide constants.

use crate::types::{Category, PackageRecord};

/// Additive weights of the relevance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Query equals the package name.
    pub exact_name: f64,
    /// Query and name contain one another.
    pub substring: f64,
    /// Per query word contained in the name.
    pub word_in_name: f64,
    /// Per query word contained in some description word.
    pub word_in_description: f64,
    /// Multiplier of `matching keywords × category weight`.
    pub category_keyword: f64,
    /// Name listed under a functionality phrase found in the query.
    pub functionality: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact_name: 100.0,
            substring: 50.0,
            word_in_name: 30.0,
            word_in_description: 20.0,
            category_keyword: 10.0,
            functionality: 40.0,
        }
    }
}

/// Keyword list and weight of one category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub category: Category,
    pub weight: f64,
    pub keywords: &'static [&'static str],
}

pub static CATEGORY_PROFILES: &[CategoryProfile] = &[
    CategoryProfile {
        category: Category::Ui,
        weight: 1.2,
        keywords: &[
            "ui", "component", "react", "vue", "svelte", "angular", "widget", "view", "render",
            "css", "style", "layout", "button", "form", "dom", "gui", "theme", "icon", "chart",
            "animation",
        ],
    },
    CategoryProfile {
        category: Category::Data,
        weight: 1.1,
        keywords: &[
            "data", "database", "db", "sql", "orm", "query", "json", "yaml", "csv", "xml",
            "serialize", "schema", "validation", "storage", "cache", "redis", "mongo",
            "postgres", "sqlite", "dataframe",
        ],
    },
    CategoryProfile {
        category: Category::Network,
        weight: 1.3,
        keywords: &[
            "http", "https", "fetch", "request", "client", "server", "api", "rest", "graphql",
            "websocket", "socket", "grpc", "network", "url", "proxy", "tcp", "web", "axios",
            "undici", "reqwest", "superagent",
        ],
    },
    CategoryProfile {
        category: Category::Testing,
        weight: 1.0,
        keywords: &[
            "test", "testing", "mock", "spec", "assert", "jest", "vitest", "mocha", "pytest",
            "coverage", "fixture", "snapshot", "bench",
        ],
    },
    CategoryProfile {
        category: Category::Build,
        weight: 0.9,
        keywords: &[
            "build", "bundle", "bundler", "compile", "compiler", "webpack", "vite", "rollup",
            "babel", "lint", "format", "transpile", "minify", "plugin", "cli",
        ],
    },
    CategoryProfile {
        category: Category::Utility,
        weight: 0.8,
        keywords: &[
            "util", "utils", "utility", "helper", "tool", "lodash", "date", "time", "string",
            "path", "log", "logging", "config", "env", "crypto", "uuid",
        ],
    },
];

/// Curated functionality phrase and the packages known to provide it.
#[derive(Debug, Clone, Copy)]
pub struct FunctionalityPhrase {
    pub phrase: &'static str,
    pub packages: &'static [&'static str],
}

pub static FUNCTIONALITY_PHRASES: &[FunctionalityPhrase] = &[
    FunctionalityPhrase {
        phrase: "http client",
        packages: &[
            "axios", "node-fetch", "got", "ky", "undici", "superagent", "requests", "httpx",
            "aiohttp", "urllib3", "reqwest", "hyper", "ureq", "surf", "resty", "okhttp",
            "net/http",
        ],
    },
    FunctionalityPhrase {
        phrase: "web server",
        packages: &[
            "express", "fastify", "koa", "hapi", "flask", "django", "fastapi", "aiohttp",
            "axum", "actix-web", "warp", "rocket", "gin", "echo", "fiber", "spring-boot",
        ],
    },
    FunctionalityPhrase {
        phrase: "web framework",
        packages: &[
            "express", "fastify", "koa", "next", "nestjs", "flask", "django", "fastapi", "axum",
            "actix-web", "rocket", "gin", "echo", "spring-boot",
        ],
    },
    FunctionalityPhrase {
        phrase: "testing framework",
        packages: &[
            "jest", "vitest", "mocha", "ava", "pytest", "unittest", "nose2", "proptest",
            "testify", "junit", "testng",
        ],
    },
    FunctionalityPhrase {
        phrase: "unit test",
        packages: &["jest", "vitest", "mocha", "pytest", "unittest", "testify", "junit"],
    },
    FunctionalityPhrase {
        phrase: "date time",
        packages: &[
            "date-fns", "dayjs", "moment", "luxon", "arrow", "pendulum", "chrono", "time",
            "joda-time",
        ],
    },
    FunctionalityPhrase {
        phrase: "state management",
        packages: &["redux", "zustand", "mobx", "pinia", "vuex", "jotai", "recoil"],
    },
    FunctionalityPhrase {
        phrase: "schema validation",
        packages: &["zod", "yup", "joi", "ajv", "pydantic", "marshmallow", "validator"],
    },
    FunctionalityPhrase {
        phrase: "orm",
        packages: &[
            "prisma", "typeorm", "sequelize", "drizzle-orm", "sqlalchemy", "peewee", "diesel",
            "sea-orm", "gorm", "hibernate-core",
        ],
    },
    FunctionalityPhrase {
        phrase: "command line",
        packages: &["commander", "yargs", "click", "typer", "argparse", "clap", "cobra"],
    },
    FunctionalityPhrase {
        phrase: "logging",
        packages: &[
            "winston", "pino", "bunyan", "loguru", "structlog", "tracing", "log", "env_logger",
            "zap", "logrus", "slog", "slf4j-api", "logback-classic",
        ],
    },
    FunctionalityPhrase {
        phrase: "serialization",
        packages: &["serde", "serde_json", "protobuf", "msgpack", "jackson-databind", "gson"],
    },
    FunctionalityPhrase {
        phrase: "async runtime",
        packages: &["tokio", "async-std", "smol", "asyncio", "trio", "anyio"],
    },
    FunctionalityPhrase {
        phrase: "data analysis",
        packages: &["pandas", "numpy", "polars", "scipy", "danfojs"],
    },
];

/// Scores one record against a free-text query.
///
/// # Examples
///
/// ```
/// use modscout_core::scoring::score;
/// use modscout_core::PackageRecord;
///
/// let axios = PackageRecord::declared("axios", "^1.6.0");
/// let lodash = PackageRecord::declared("lodash", "^4.17.21");
/// assert!(score("http client", &axios) > score("http client", &lodash));
/// ```
pub fn score(query: &str, record: &PackageRecord) -> f64 {
    score_with(&ScoreWeights::default(), query, record)
}

pub fn score_with(weights: &ScoreWeights, query: &str, record: &PackageRecord) -> f64 {
    let query = query.trim().to_lowercase();
    let name = record.name.to_lowercase();
    let description = record
        .description
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if query.is_empty() || name.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;

    if name == query {
        total += weights.exact_name;
    }
    if name.contains(&query) || query.contains(&name) {
        total += weights.substring;
    }

    let description_words: Vec<&str> = description.split_whitespace().collect();
    for word in query.split_whitespace() {
        if name.contains(word) {
            total += weights.word_in_name;
        }
        if description_words.iter().any(|d| d.contains(word)) {
            total += weights.word_in_description;
        }
    }

    for profile in CATEGORY_PROFILES {
        let hits = profile
            .keywords
            .iter()
            .filter(|kw| query.contains(*kw) || name.contains(*kw) || description.contains(*kw))
            .count();
        if hits > 0 {
            total += hits as f64 * weights.category_keyword * profile.weight;
        }
    }

    let functionality_hit = FUNCTIONALITY_PHRASES
        .iter()
        .any(|entry| query.contains(entry.phrase) && entry.packages.contains(&name.as_str()));
    if functionality_hit {
        total += weights.functionality;
    }

    total
}

/// Scores, filters, sorts and truncates `records`.
///
/// Records scoring zero are dropped. When `category` is set, only records
/// whose name or description mentions one of its keywords are kept. Ties keep
/// their input order.
pub fn rank(
    query: &str,
    records: Vec<PackageRecord>,
    category: Option<Category>,
    max_results: usize,
) -> Vec<PackageRecord> {
    let profile = category.and_then(profile_of);

    let mut scored: Vec<(f64, PackageRecord)> = records
        .into_iter()
        .filter(|record| profile.is_none_or(|p| mentions_any(record, p.keywords)))
        .map(|record| (score(query, &record), record))
        .filter(|(s, _)| *s > 0.0)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(max_results);

    scored
        .into_iter()
        .map(|(s, mut record)| {
            record.score = Some(s);
            record
        })
        .collect()
}

/// Picks the category whose keywords best describe `record`.
///
/// Name hits count twice, description hits once, each multiplied by the
/// category weight. Falls back to [`Category::Utility`].
pub fn categorize(record: &PackageRecord) -> Category {
    let name = record.name.to_lowercase();
    let description = record
        .description
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut best = Category::Utility;
    let mut best_score = 0.0;

    for profile in CATEGORY_PROFILES {
        let hits: usize = profile
            .keywords
            .iter()
            .map(|kw| {
                let in_name = if name.contains(kw) { 2 } else { 0 };
                let in_description = usize::from(description.contains(kw));
                in_name + in_description
            })
            .sum();
        let weighted = hits as f64 * profile.weight;
        if weighted > best_score {
            best_score = weighted;
            best = profile.category;
        }
    }

    best
}

pub fn profile_of(category: Category) -> Option<&'static CategoryProfile> {
    CATEGORY_PROFILES.iter().find(|p| p.category == category)
}

fn mentions_any(record: &PackageRecord, keywords: &[&str]) -> bool {
    let name = record.name.to_lowercase();
    let description = record
        .description
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    keywords
        .iter()
        .any(|kw| name.contains(kw) || description.contains(kw))
}
