use anyhow::{Context, Result};
use comet_core::Event;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;
use tracing::warn;

/// Event reader for JSONL dumps, one NIP-01 JSON event per line.
///
/// Lines that fail to parse or fail field hygiene are skipped and
/// counted rather than aborting the run; relay dumps routinely contain
/// a few mangled lines. Files ending in `.gz` are decompressed on the
/// fly.
pub struct EventReader {
    reader: Lines<BufReader<Box<dyn Read>>>,
    skipped: usize,
}

impl EventReader {
    /// Open a dump file for reading.
    pub fn open(input: &str) -> Result<Self> {
        let path = Path::new(input);
        if !path.exists() {
            anyhow::bail!("Input file does not exist: {}", input);
        }

        let file = File::open(path).context(format!("Failed to open input file: {}", input))?;

        let raw: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let reader = BufReader::with_capacity(1024 * 1024, raw); // 1MB buffer

        Ok(Self {
            reader: reader.lines(),
            skipped: 0,
        })
    }

    /// The number of lines skipped because they were not valid events.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Read the whole dump, returning the parseable events.
    pub fn read_all(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for event in self.by_ref() {
            events.push(event?);
        }
        Ok(events)
    }
}

impl Iterator for EventReader {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.reader.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e).context("Failed to read line from file")),
            };

            if line.trim().is_empty() {
                continue;
            }

            match Event::try_from(line.as_str()) {
                Ok(event) => return Some(Ok(event)),
                Err(e) => {
                    warn!("skipping line: {}", e);
                    self.skipped += 1;
                }
            }
        }
    }
}
