//! The JSON manifest (`data/chapters.json`) that describes the whole
//! phase/volume/chapter tree for client-side use.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;

use crate::config::Site;
use crate::manuscript::Phase;

/// The manifest's location relative to the output directory.
pub const MANIFEST_PATH: &str = "data/chapters.json";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,

    /// ISO-8601 UTC with millisecond precision, e.g.
    /// `2026-01-02T03:04:05.678Z`.
    pub last_updated: String,
    pub phases: &'a [Phase],
}

impl<'a> Manifest<'a> {
    pub fn new(site: &'a Site, phases: &'a [Phase], last_updated: DateTime<Utc>) -> Manifest<'a> {
        Manifest {
            title: &site.title,
            subtitle: &site.subtitle,
            last_updated: last_updated.to_rfc3339_opts(SecondsFormat::Millis, true),
            phases,
        }
    }

    /// Writes the manifest as pretty-printed JSON.
    pub fn write_to<W: Write>(&self, w: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(w, self)
    }
}
