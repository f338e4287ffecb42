//! End-of-run summary: the plain-text report and its JSON form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{IterationTally, SampleSet};

/// Width of the separator line between the two report blocks.
const SEPARATOR_WIDTH: usize = 30;

/// Reportable view of one collection: label, size, samples and mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSummary {
    pub label: String,
    pub count: usize,
    /// `None` when the collection is empty.
    pub mean: Option<f64>,
    pub samples: Vec<f64>,
}

impl SampleSummary {
    /// Builds the view, mapping an empty collection's mean error to `None`.
    pub fn from_set(set: &SampleSet) -> Self {
        Self {
            label: set.kind().label().to_string(),
            count: set.len(),
            mean: set.mean().ok(),
            samples: set.values().to_vec(),
        }
    }

    fn render_block(&self, out: &mut String) {
        out.push_str(&format!("{}\t: {:?}\n", self.label, self.samples));
        match self.mean {
            Some(mean) => out.push_str(&format!("avg: {mean}\n")),
            None => out.push_str(&format!("avg: no data ({} samples)\n", self.count)),
        }
    }
}

/// Complete result of one sampling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub command: String,
    pub iterations_requested: usize,
    pub iterations_run: usize,
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub tally: IterationTally,
    pub allocate: SampleSummary,
    pub deallocate: SampleSummary,
}

impl RunSummary {
    /// Renders the report: allocate block, a `=` separator line, deallocate
    /// block. Each block is the sample list followed by its mean.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.allocate.render_block(&mut out);
        out.push_str(&"=".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        self.deallocate.render_block(&mut out);
        out
    }
}
