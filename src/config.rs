use clap::Parser;
use config::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use crate::services::mutation::MutationPolicy;
use crate::services::quiz::{AllCategoriesMode, QuizEngine};

/// Q&A 트리비아 웹 서비스
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// 설정 파일 경로. 파일이 없으면 무시한다.
    #[clap(short, long, default_value = "setup")]
    pub config: String,
    /// 로그 수준 (예: warn, info, debug)
    #[clap(short, long)]
    pub log_level: Option<String>,
    #[clap(long)]
    pub host: Option<String>,
    #[clap(short, long)]
    pub port: Option<u16>,
    /// PostgreSQL 연결 문자열. 없으면 메모리 저장소를 쓴다.
    #[clap(long)]
    pub database_url: Option<String>,
    /// 메모리 저장소를 채울 JSON 파일
    #[clap(long)]
    pub seed_file: Option<String>,
    /// 퀴즈 난수 생성기의 시드
    #[clap(long)]
    pub quiz_seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct QuizConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    pub all_categories: AllCategoriesMode,
    pub category_min: i32,
    pub category_max: i32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub seed_file: Option<String>,
    pub require_known_category: bool,
    pub quiz: QuizConfig,
}

impl Config {
    /// 기본값 < 설정 파일 < TRIVIA_ 환경 변수 < 명령줄 인자 순으로 덮어쓴다.
    pub fn new(args: Args) -> Result<Config, handle_errors::Error> {
        dotenv::dotenv().ok();
        Self::load(args, "TRIVIA").map_err(handle_errors::Error::ConfigError)
    }

    pub fn load(args: Args, env_prefix: &str) -> Result<Config, ConfigError> {
        let mut config: Config = config::Config::builder()
            .set_default("log_level", "warn")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3030_i64)?
            .set_default("require_known_category", true)?
            .set_default("quiz.all_categories", "every")?
            .set_default("quiz.category_min", 1_i64)?
            .set_default("quiz.category_max", 6_i64)?
            .add_source(config::File::with_name(&args.config).required(false))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(host) = args.host {
            config.host = host;
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if args.database_url.is_some() {
            config.database_url = args.database_url;
        }
        if args.seed_file.is_some() {
            config.seed_file = args.seed_file;
        }
        if args.quiz_seed.is_some() {
            config.quiz.seed = args.quiz_seed;
        }

        if config.quiz.category_min > config.quiz.category_max {
            return Err(ConfigError::Message(format!(
                "quiz.category_min ({}) is greater than quiz.category_max ({})",
                config.quiz.category_min, config.quiz.category_max
            )));
        }

        Ok(config)
    }

    pub fn address(&self) -> Result<SocketAddr, handle_errors::Error> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(handle_errors::Error::AddressError)?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// RUST_LOG가 없을 때 쓰는 추적 필터
    pub fn log_filter(&self) -> String {
        format!(
            "handle_errors={level},trivia_api={level},warp={level}",
            level = self.log_level
        )
    }

    pub fn quiz_engine(&self) -> QuizEngine {
        QuizEngine::new(
            self.quiz.seed,
            self.quiz.all_categories,
            self.quiz.category_min..=self.quiz.category_max,
        )
    }

    pub fn mutation_policy(&self) -> MutationPolicy {
        MutationPolicy {
            require_known_category: self.require_known_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["trivia-api", "--config", "/nonexistent/setup"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_apply_without_sources() {
        let config = Config::load(args(&[]), "TRIVIA_TEST_DEFAULTS").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.port, 3030);
        assert_eq!(config.database_url, None);
        assert!(config.require_known_category);
        assert_eq!(config.quiz.all_categories, AllCategoriesMode::Every);
        assert_eq!((config.quiz.category_min, config.quiz.category_max), (1, 6));
        assert_eq!(config.address().unwrap().to_string(), "127.0.0.1:3030");
    }

    #[test]
    fn file_then_environment_then_flags() {
        let path = std::env::temp_dir().join(format!("trivia_setup_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "port = 4000\nlog_level = \"info\"\n\n[quiz]\nall_categories = \"random_category\"\nseed = 7\n",
        )
        .unwrap();
        // SAFETY: 이 테스트만 사용하는 접두사의 변수다.
        unsafe {
            std::env::set_var("TRIVIA_TEST_LAYERS_PORT", "5000");
            std::env::set_var("TRIVIA_TEST_LAYERS_REQUIRE_KNOWN_CATEGORY", "false");
        }

        let argv = Args::parse_from([
            "trivia-api",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "debug",
        ]);
        let config = Config::load(argv, "TRIVIA_TEST_LAYERS").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 5000);
        assert_eq!(config.log_level, "debug");
        assert!(!config.require_known_category);
        assert_eq!(config.quiz.all_categories, AllCategoriesMode::RandomCategory);
        assert_eq!(config.quiz.seed, Some(7));
    }

    #[test]
    fn inverted_category_range_is_rejected() {
        // SAFETY: 이 테스트만 사용하는 접두사의 변수다.
        unsafe {
            std::env::set_var("TRIVIA_TEST_RANGE_QUIZ__CATEGORY_MIN", "9");
        }
        assert!(Config::load(args(&[]), "TRIVIA_TEST_RANGE").is_err());
    }

    #[test]
    fn bad_host_is_an_address_error() {
        let config = Config::load(args(&["--host", "not-an-ip"]), "TRIVIA_TEST_HOST").unwrap();
        assert!(matches!(
            config.address(),
            Err(handle_errors::Error::AddressError(_))
        ));
    }
}
