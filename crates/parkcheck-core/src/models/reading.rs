use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The ten voice measurements submitted on the clinical data form, after
/// parsing and range validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalReading {
    /// Pitch period entropy.
    pub ppe: f64,
    /// MDVP:Fo(Hz), average vocal fundamental frequency.
    pub fo: f64,
    /// MDVP:Flo(Hz), minimum vocal fundamental frequency.
    pub flo: f64,
    /// Jitter:DDP.
    pub ddp: f64,
    /// MDVP:Jitter(Abs).
    pub jitter_abs: f64,
    pub spread1: f64,
    pub spread2: f64,
    /// MDVP:Fhi(Hz), maximum vocal fundamental frequency.
    pub fhi: f64,
    /// Noise-to-harmonics ratio.
    pub nhr: f64,
    /// Shimmer:APQ5.
    pub apq5: f64,
}

/// Raw text of the clinical data form as the user last entered it.
///
/// Kept per session so the form can be shown again after a submission.
/// Field order matches the form layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalForm {
    #[serde(default)]
    pub ppe: String,
    #[serde(default)]
    pub fo: String,
    #[serde(default)]
    pub flo: String,
    #[serde(default)]
    pub ddp: String,
    #[serde(default)]
    pub jitter_abs: String,
    #[serde(default)]
    pub spread1: String,
    #[serde(default)]
    pub spread2: String,
    #[serde(default)]
    pub fhi: String,
    #[serde(default)]
    pub nhr: String,
    #[serde(default)]
    pub apq5: String,
}

impl ClinicalForm {
    /// Field values in form order: PPE, Fo, Flo, DDP, Jitter(Abs), Spread1,
    /// Spread2, Fhi, NHR, APQ5.
    pub fn values(&self) -> [&str; 10] {
        [
            &self.ppe,
            &self.fo,
            &self.flo,
            &self.ddp,
            &self.jitter_abs,
            &self.spread1,
            &self.spread2,
            &self.fhi,
            &self.nhr,
            &self.apq5,
        ]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|v| v.is_empty())
    }
}
