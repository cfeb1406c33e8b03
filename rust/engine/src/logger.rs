use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cards::Card;
use crate::round::{Coup, Outcome};

/// One simulated coup as stored in a JSONL round history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier for this round (format: YYYYMMDD-NNNNNN)
    pub round_id: String,
    /// Seed of the shoe that dealt the round
    pub seed: Option<u64>,
    pub player: Vec<Card>,
    pub banker: Vec<Card>,
    pub player_total: u8,
    pub banker_total: u8,
    pub outcome: Outcome,
    #[serde(default)]
    pub natural: bool,
    /// Timestamp when the round was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    pub fn from_coup(round_id: String, seed: Option<u64>, coup: &Coup) -> Self {
        Self {
            round_id,
            seed,
            player: coup.player.clone(),
            banker: coup.banker.clone(),
            player_total: coup.player_total,
            banker_total: coup.banker_total,
            outcome: coup.outcome,
            natural: coup.natural,
            ts: None,
        }
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`RoundRecord`]s to a JSONL file, one object per LF-terminated line.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger without a sink and with a fixed date, for id sequencing.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // stamp records that arrive without a time
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
