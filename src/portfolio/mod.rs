// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Portfolio data loaded from YAML files in the data directory.
//!
//! Text values in these files may carry the inline markup tags understood by
//! [`crate::markup`]; templates run them through the `format_text` filter.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

pub const INTRO_FILE: &str = "intro.yaml";
pub const SKILLS_FILE: &str = "skills.yaml";
pub const PROJECTS_FILE: &str = "projects.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intro {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<ContactLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A titled block of body text inside a project writeup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    #[serde(default)]
    pub body: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub links: Vec<ContactLink>,
    #[serde(default)]
    pub troubleshooting: Vec<Section>,
    #[serde(default)]
    pub insights: Vec<Section>,
}

/// All portfolio data, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PortfolioData {
    pub intro: Intro,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
}

#[derive(Debug)]
pub enum PortfolioError {
    Read(String, std::io::Error),
    Parse(String, serde_yaml::Error),
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::Read(file, err) => {
                write!(f, "Failed to read portfolio file '{}': {}", file, err)
            }
            PortfolioError::Parse(file, err) => {
                write!(f, "Failed to parse portfolio file '{}': {}", file, err)
            }
        }
    }
}

impl Error for PortfolioError {}

impl PortfolioData {
    pub fn load(data_dir: &Path) -> Result<Self, PortfolioError> {
        Ok(Self {
            intro: load_yaml(data_dir, INTRO_FILE)?,
            skills: load_yaml(data_dir, SKILLS_FILE)?,
            projects: load_yaml(data_dir, PROJECTS_FILE)?,
        })
    }
}

fn load_yaml<T: serde::de::DeserializeOwned>(
    data_dir: &Path,
    file_name: &str,
) -> Result<T, PortfolioError> {
    let path = data_dir.join(file_name);
    let raw = fs::read_to_string(&path)
        .map_err(|err| PortfolioError::Read(file_name.to_string(), err))?;
    serde_yaml::from_str(&raw).map_err(|err| PortfolioError::Parse(file_name.to_string(), err))
}
