use crate::domain::model::SecretRequirement;
use crate::utils::error::{DeployError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// `deploy.toml`. Every section is optional; omitted ones fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployToml {
    pub tool: Option<ToolSection>,
    pub deploy: Option<DeploySection>,
    pub dashboard: Option<DashboardSection>,
    pub secrets: Option<Vec<SecretRequirement>>,
    pub verify: Option<VerifySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSection {
    pub program: Option<String>,
    pub install: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySection {
    pub extra_args: Option<Vec<String>>,
    pub project_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSection {
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifySection {
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"))
}

impl DeployToml {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeployError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: toml::Table = content.parse()?;
        Self::substitute_env_vars(&mut table);
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// 替換字串值中的環境變數 (例如 ${DEPLOYMENT_URL})，未設定的保留原樣。
    /// 在解析後才替換，值裡的引號或換行不會改變文件結構。
    fn substitute_env_vars(table: &mut toml::Table) {
        for (_, value) in table.iter_mut() {
            substitute_value(value);
        }
    }
}

fn substitute_value(value: &mut toml::Value) {
    match value {
        toml::Value::String(text) => {
            if placeholder_pattern().is_match(text) {
                *text = placeholder_pattern()
                    .replace_all(text, |caps: &regex::Captures| {
                        let var_name = &caps[1];
                        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                    })
                    .into_owned();
            }
        }
        toml::Value::Array(items) => items.iter_mut().for_each(substitute_value),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| substitute_value(v)),
        _ => {}
    }
}

/// True when a value still carries a `${VAR}` placeholder nobody filled in.
pub fn has_unresolved_placeholder(value: &str) -> bool {
    placeholder_pattern().is_match(value)
}
