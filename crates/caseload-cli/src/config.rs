// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use caseload_app::PageKind;
use caseload_view::ViewportBreakpoints;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_START_PAGE: &str = "cases";
// Terminal-cell equivalents of the breakpoint widths the page defaults key on.
const DEFAULT_MOBILE_BELOW: u16 = 80;
const DEFAULT_COMPACT_TOOLBAR_BELOW: u16 = 110;
const DEFAULT_SEED: u64 = 2026;
const DEFAULT_CASES: usize = 28;
const DEFAULT_CLIENTS: usize = 16;
const DEFAULT_NOTICES: usize = 12;
const MAX_DEMO_ROWS: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub data: Data,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            data: Data::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_page: Option<String>,
    pub mobile_below: Option<u16>,
    pub compact_toolbar_below: Option<u16>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_page: Some(DEFAULT_START_PAGE.to_owned()),
            mobile_below: Some(DEFAULT_MOBILE_BELOW),
            compact_toolbar_below: Some(DEFAULT_COMPACT_TOOLBAR_BELOW),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub seed: Option<u64>,
    pub cases: Option<usize>,
    pub clients: Option<usize>,
    pub notices: Option<usize>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            seed: Some(DEFAULT_SEED),
            cases: Some(DEFAULT_CASES),
            clients: Some(DEFAULT_CLIENTS),
            notices: Some(DEFAULT_NOTICES),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CASELOAD_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CASELOAD_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(caseload_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and place values under [storage], [ui], and [data]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            caseload_store::validate_db_path(db_path)?;
        }

        if let Some(start_page) = &self.ui.start_page
            && PageKind::parse(start_page).is_none()
        {
            bail!(
                "ui.start_page in {} must be one of cases, clients, notices; got {start_page:?}",
                path.display()
            );
        }

        let breakpoints = self.breakpoints();
        if breakpoints.mobile_below == 0 {
            bail!(
                "ui.mobile_below in {} must be positive",
                path.display()
            );
        }
        if breakpoints.mobile_below >= breakpoints.compact_toolbar_below {
            bail!(
                "ui.mobile_below ({}) in {} must be below ui.compact_toolbar_below ({})",
                breakpoints.mobile_below,
                path.display(),
                breakpoints.compact_toolbar_below
            );
        }

        for (name, count) in [
            ("data.cases", self.cases()),
            ("data.clients", self.clients()),
            ("data.notices", self.notices()),
        ] {
            if count == 0 || count > MAX_DEMO_ROWS {
                bail!(
                    "{name} in {} must be between 1 and {MAX_DEMO_ROWS}, got {count}",
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => caseload_store::default_db_path(),
        }
    }

    pub fn start_page(&self) -> PageKind {
        self.ui
            .start_page
            .as_deref()
            .and_then(PageKind::parse)
            .unwrap_or(PageKind::Cases)
    }

    pub fn breakpoints(&self) -> ViewportBreakpoints {
        ViewportBreakpoints {
            mobile_below: self.ui.mobile_below.unwrap_or(DEFAULT_MOBILE_BELOW),
            compact_toolbar_below: self
                .ui
                .compact_toolbar_below
                .unwrap_or(DEFAULT_COMPACT_TOOLBAR_BELOW),
        }
    }

    pub fn seed(&self) -> u64 {
        self.data.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn cases(&self) -> usize {
        self.data.cases.unwrap_or(DEFAULT_CASES)
    }

    pub fn clients(&self) -> usize {
        self.data.clients.unwrap_or(DEFAULT_CLIENTS)
    }

    pub fn notices(&self) -> usize {
        self.data.notices.unwrap_or(DEFAULT_NOTICES)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# caseload config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/caseload/caseload.db)\n# db_path = \"/absolute/path/to/caseload.db\"\n\n[ui]\nstart_page = \"{}\"\n# Terminal widths (columns) below which the layout defaults change.\nmobile_below = {}\ncompact_toolbar_below = {}\n\n[data]\nseed = {}\ncases = {}\nclients = {}\nnotices = {}\n",
            path.display(),
            DEFAULT_START_PAGE,
            DEFAULT_MOBILE_BELOW,
            DEFAULT_COMPACT_TOOLBAR_BELOW,
            DEFAULT_SEED,
            DEFAULT_CASES,
            DEFAULT_CLIENTS,
            DEFAULT_NOTICES,
        )
    }
}
