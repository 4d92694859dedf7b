//! The `read`, `search` and `groups` commands.
//!
//! Each command asks the [`Selector`] for whatever the arguments left open, runs the
//! query through [`LogRetrieval`] and writes the result.

#![warn(clippy::all, rust_2018_idioms)]

use std::io::Write;

use anyhow::{bail, Result};

use crate::app::cli::{ReadArgs, SearchArgs};
use crate::app::data_plane::cloudwatch_logs::{LogRetrieval, LogsApi, ResourceMap, TimeRange};
use crate::app::prompt::Selector;
use crate::app::render::{service_label, EventRenderer};
use crate::app::time_input::{
    parse_date, parse_time, to_millis, validate_optional_date, validate_time,
};

pub struct Commands<A: LogsApi, S, W> {
    retrieval: LogRetrieval<A>,
    selector: S,
    out: W,
    renderer: EventRenderer,
    group_by_service: bool,
}

impl<A, S, W> Commands<A, S, W>
where
    A: LogsApi,
    S: Selector,
    W: Write,
{
    pub fn new(
        retrieval: LogRetrieval<A>,
        selector: S,
        out: W,
        renderer: EventRenderer,
        group_by_service: bool,
    ) -> Self {
        Self {
            retrieval,
            selector,
            out,
            renderer,
            group_by_service,
        }
    }

    pub fn into_parts(self) -> (S, W) {
        (self.selector, self.out)
    }

    /// Print every event of one log stream
    pub async fn read(&mut self, args: &ReadArgs) -> Result<()> {
        let log_group = match &args.log_group {
            Some(name) => name.clone(),
            None => self.select_log_group().await?,
        };

        let log_stream = match &args.stream {
            Some(name) => name.clone(),
            None => self.select_log_stream(&log_group).await?,
        };

        let events = self.retrieval.fetch_events(&log_group, &log_stream).await?;

        self.renderer
            .with_json(args.json)
            .write_events(&mut self.out, &events)
    }

    /// Print events of a log group matching a pattern and time range.
    ///
    /// Without `--pattern` the pattern and both bounds are prompted; with it, bounds
    /// not given on the command line stay open.
    pub async fn search(&mut self, args: &SearchArgs) -> Result<()> {
        let log_group = match &args.log_group {
            Some(name) => name.clone(),
            None => self.select_log_group().await?,
        };

        let (pattern, start, end) = match &args.pattern {
            Some(pattern) => (pattern.clone(), args.start, args.end),
            None => {
                let pattern = self.selector.input("Filter Pattern", &accept_any)?;
                let start = match args.start {
                    Some(start) => Some(start),
                    None => self.prompt_instant("Start")?,
                };
                let end = match args.end {
                    Some(end) => Some(end),
                    None => self.prompt_instant("End")?,
                };
                (pattern, start, end)
            }
        };

        let range = TimeRange::new(start, end)?;
        let events = self
            .retrieval
            .search_events(&log_group, &pattern, range)
            .await?;

        self.renderer
            .with_json(args.json)
            .write_events(&mut self.out, &events)
    }

    /// Print every log group under its service
    pub async fn groups(&mut self, json: bool) -> Result<()> {
        let resources = self.retrieval.list_grouped_resources().await?;

        if json {
            serde_json::to_writer_pretty(&mut self.out, &resources)?;
            writeln!(self.out)?;
        } else {
            for service in resources.services() {
                writeln!(self.out, "{}", service_label(&service))?;
                for resource in resources.resources(&service) {
                    writeln!(self.out, "  {}", resource)?;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    async fn select_log_group(&mut self) -> Result<String> {
        if !self.group_by_service {
            let log_groups = self.retrieval.list_log_groups().await?;
            if log_groups.is_empty() {
                bail!("No log groups found");
            }
            let index = self.selector.select("Select Log Group", &log_groups)?;
            return Ok(log_groups[index].clone());
        }

        let resources = self.retrieval.list_grouped_resources().await?;
        if resources.is_empty() {
            bail!("No log groups found");
        }

        let services = resources.services();
        let labels: Vec<String> = services.iter().map(|s| service_label(s)).collect();
        let service = &services[self.selector.select("Select Log Group - 1/2", &labels)?];

        let candidates = resources.resources(service);
        let resource = &candidates[self.selector.select("Select Log Group - 2/2", candidates)?];

        Ok(ResourceMap::log_group_name(service, resource))
    }

    async fn select_log_stream(&mut self, log_group: &str) -> Result<String> {
        let streams = self.retrieval.list_streams(log_group).await?;
        if streams.is_empty() {
            bail!("Log group {} has no log streams", log_group);
        }

        let labels: Vec<String> = streams
            .iter()
            .map(|stream| self.renderer.stream_label(stream))
            .collect();
        let index = self.selector.select("Select Log Stream", &labels)?;

        Ok(streams[index].name.clone())
    }

    /// Date then time, or `None` when the date is left blank
    fn prompt_instant(&mut self, label_prefix: &str) -> Result<Option<i64>> {
        let date = self.selector.input(
            &format!("{label_prefix} Date (YYYY-MM-DD)"),
            &validate_optional_date,
        )?;
        if date.trim().is_empty() {
            return Ok(None);
        }

        let time = self
            .selector
            .input(&format!("{label_prefix} Time (HH:MM:SS)"), &validate_time)?;

        Ok(Some(to_millis(parse_date(&date)?, parse_time(&time)?)))
    }
}

fn accept_any(_: &str) -> Result<(), String> {
    Ok(())
}
