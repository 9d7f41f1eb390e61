use crate::engine::RuleListing;
use crate::model::{NewRule, ProjectedDay};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de règles depuis CSV: header `day,intervals`,
/// `intervals` au format `HH:MM-HH:MM;HH:MM-HH:MM`.
pub fn import_rules_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NewRule>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let day = rec.get(0).context("missing day")?.trim();
        if day.is_empty() {
            bail!("invalid rule row {} (empty day)", line + 1);
        }
        let intervals = rec
            .get(1)
            .unwrap_or("")
            .split(';')
            .filter(|chunk| !chunk.trim().is_empty());
        let rule = NewRule::parse(day, intervals)
            .with_context(|| format!("invalid rule row {}", line + 1))?;
        out.push(rule);
    }
    Ok(out)
}

/// Export JSON d'une lecture (règles brutes ou projection), jolie mise en forme
pub fn export_listing_json<P: AsRef<Path>>(path: P, listing: &RuleListing) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(listing)?;
    fs::write(path.as_ref(), s)
        .with_context(|| format!("writing {}", path.as_ref().display()))?;
    Ok(())
}

/// Export CSV d'une projection: header `date,start,end`, une ligne par créneau.
pub fn export_projection_csv<P: AsRef<Path>>(
    path: P,
    days: &[ProjectedDay],
) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_projection_csv(file, days)
}

pub fn write_projection_csv<W: std::io::Write>(
    out: W,
    days: &[ProjectedDay],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["date", "start", "end"])?;
    for day in days {
        for interval in &day.intervals {
            let start = crate::calendar::format_time(interval.start);
            let end = crate::calendar::format_time(interval.end);
            w.write_record([day.label.as_str(), start.as_str(), end.as_str()])?;
        }
    }
    w.flush()?;
    Ok(())
}
