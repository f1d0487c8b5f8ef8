use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use regex::Regex;

use crate::coerce::DEFAULT_DELIMITER;
use crate::config::KiperConfig;
use crate::declare::{self, Declared};
use crate::error::KiperError;
use crate::file;
use crate::resolve::{self, ResolveInput};
use crate::types::SearchPath;

/// Entry point: declares flags from a config, parses arguments, loads config
/// files, and merges everything into the config.
///
/// ```ignore
/// let mut config = Config::default();
/// Kiper::new("myapp", "does things")
///     .config_file_flag("config", "config file", "./config.json")
///     .env_prefix("MYAPP")
///     .parse(&mut config, std::env::args_os().skip(1))?;
/// ```
#[derive(Debug, Clone)]
pub struct Kiper {
    name: String,
    about: String,
    config_paths: Vec<PathBuf>,
    search_paths: Vec<SearchPath>,
    file_name: Option<String>,
    config_flag: Option<ConfigFileFlag>,
    env_prefix: Option<String>,
    env_enabled: bool,
    delimiter: String,
}

#[derive(Debug, Clone)]
struct ConfigFileFlag {
    name: String,
    help: String,
    default: Option<String>,
}

impl Kiper {
    pub fn new(name: &str, about: &str) -> Self {
        Self {
            name: name.to_string(),
            about: about.to_string(),
            config_paths: Vec::new(),
            search_paths: Vec::new(),
            file_name: None,
            config_flag: None,
            env_prefix: None,
            env_enabled: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Add a config file to load. Repeatable; later files override earlier ones.
    pub fn config_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_paths.push(path.into());
        self
    }

    /// Directories to search for the config file, in priority-ascending order.
    ///
    /// Files found here rank below [`config_file_path`](Self::config_file_path)
    /// entries and the config-file flag.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Config file name looked up in each search path (default: `"{name}.json"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Declare a flag whose value is the path of a config file.
    ///
    /// The file it names has the highest priority among config files. An
    /// empty `default` means no file unless the flag is given.
    pub fn config_file_flag(mut self, name: &str, help: &str, default: &str) -> Self {
        self.config_flag = Some(ConfigFileFlag {
            name: name.to_string(),
            help: help.to_string(),
            default: Some(default.to_string()).filter(|d| !d.is_empty()),
        });
        self
    }

    /// Prefix for environment variable names (default: none).
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable lookup entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Regex separating elements of a sequence given as one string
    /// (default: `\s*,\s*`).
    pub fn delimiter(mut self, pattern: &str) -> Self {
        self.delimiter = pattern.to_string();
        self
    }

    fn effective_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{}.json", self.name))
    }

    /// Build the `clap::Command` for `config` together with its flag tree.
    fn build_command(&self, config: &mut dyn KiperConfig) -> Result<(Command, Declared), KiperError> {
        let declared = declare::declare(config)?;

        let mut command = Command::new(self.name.clone())
            .about(self.about.clone())
            .no_binary_name(true)
            .args_override_self(true)
            .args(declared.args.iter().cloned());

        if let Some(flag) = &self.config_flag {
            if declared.tree.contains_key(&flag.name) {
                return Err(KiperError::DuplicateName(flag.name.clone()));
            }
            let mut arg = Arg::new(flag.name.clone())
                .long(flag.name.clone())
                .help(flag.help.clone())
                .value_name("FILE")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf));
            if let Some(default) = &flag.default {
                arg = arg.default_value(default.clone());
            }
            command = command.arg(arg);
        }

        Ok((command, declared))
    }

    /// The assembled `clap::Command`, e.g. for rendering help.
    pub fn command(&self, config: &mut dyn KiperConfig) -> Result<Command, KiperError> {
        self.build_command(config).map(|(command, _)| command)
    }

    /// Config file candidates in priority-ascending order.
    fn config_files(&self, matches: &ArgMatches) -> Vec<PathBuf> {
        let mut paths =
            file::candidate_paths(&self.search_paths, &self.effective_file_name(), &self.name);
        paths.extend(self.config_paths.iter().cloned());
        if let Some(flag) = &self.config_flag
            && let Some(path) = matches.get_one::<PathBuf>(&flag.name)
        {
            paths.push(path.clone());
        }
        paths
    }

    /// Parse `args` (without the program name) and populate `config`.
    ///
    /// Declares flags, parses arguments, loads config files, and merges env >
    /// file > flag into each field. Argument errors, including `--help` and
    /// missing required flags, are returned as [`KiperError::Flags`].
    pub fn parse<I, T>(&self, config: &mut dyn KiperConfig, args: I) -> Result<(), KiperError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.parse_with_env(config, args, std::env::vars().collect())
    }

    /// Like [`parse`](Self::parse) with an explicit environment instead of
    /// the process environment.
    pub fn parse_with_env<I, T>(
        &self,
        config: &mut dyn KiperConfig,
        args: I,
        env_vars: Vec<(String, String)>,
    ) -> Result<(), KiperError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let delimiter = Regex::new(&self.delimiter)?;
        let (command, declared) = self.build_command(config)?;
        let matches = command.try_get_matches_from(args)?;
        let flags = declare::flag_values(&declared.tree, &matches);

        let files = file::load_all(&self.config_files(&matches))?;

        let input = ResolveInput {
            flags,
            files,
            env_vars,
            env_prefix: self.env_prefix.clone(),
            env_enabled: self.env_enabled,
            delimiter,
        };
        resolve::resolve(config, input)
    }
}
