//! Return-on-investment calculator for therapy.

use serde::Serialize;

use crate::core::errors::{CalmError, Result};
use crate::page::Page;

use super::regions::{
    ROI_BENEFIT, ROI_CALCULATE, ROI_HEALTH, ROI_LOST_HOURS, ROI_PERCENT, ROI_PRODUCTIVITY,
    ROI_RELATIONSHIP, ROI_RESULT, ROI_THERAPY, ROI_TOTAL_COST, SHOW,
};
use super::{Widget, WidgetStatus, require_regions};

/// Hourly value of lost time, MXN.
const HOURLY_VALUE: f64 = 200.0;
/// Weeks per month.
const WEEKS: f64 = 4.0;
/// Cost per impact point, MXN.
const IMPACT_COST: f64 = 150.0;
/// Share of the cost therapy is expected to recover.
const RECOVERY: f64 = 0.7;

pub const EMPTY_INPUT_MESSAGE: &str = "Por favor ingresa algunos datos para calcular.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoiInputs {
    /// Hours lost per week.
    pub lost_hours: f64,
    pub productivity: f64,
    /// Relationship impact score, at least 1.
    pub relationship: f64,
    /// Health impact score, at least 1.
    pub health: f64,
    pub therapy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiResult {
    pub cost: f64,
    pub benefit: f64,
    pub roi_percent: f64,
}

impl RoiResult {
    #[must_use]
    pub fn cost_label(&self) -> String {
        format!("${} MXN", format_es_mx(self.cost))
    }

    #[must_use]
    pub fn benefit_label(&self) -> String {
        format!("${} MXN", format_es_mx(self.benefit))
    }

    #[must_use]
    pub fn roi_label(&self) -> String {
        format!("{:.0}%", self.roi_percent.round())
    }
}

fn non_negative(raw: Option<f64>) -> f64 {
    raw.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

fn impact(raw: Option<f64>) -> f64 {
    raw.filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(1.0)
        .max(1.0)
}

impl RoiInputs {
    /// Normalise raw field values: missing or invalid amounts become 0,
    /// impact scores never drop below 1.
    #[must_use]
    pub fn normalised(
        lost_hours: Option<f64>,
        productivity: Option<f64>,
        relationship: Option<f64>,
        health: Option<f64>,
        therapy: Option<f64>,
    ) -> Self {
        Self {
            lost_hours: non_negative(lost_hours),
            productivity: non_negative(productivity),
            relationship: impact(relationship),
            health: impact(health),
            therapy: non_negative(therapy),
        }
    }

    /// Read the input regions of `page`.
    #[must_use]
    pub fn from_page(page: &dyn Page) -> Self {
        let field = |id: &str| page.text(id).and_then(|t| t.trim().parse::<f64>().ok());
        Self::normalised(
            field(ROI_LOST_HOURS),
            field(ROI_PRODUCTIVITY),
            field(ROI_RELATIONSHIP),
            field(ROI_HEALTH),
            field(ROI_THERAPY),
        )
    }

    pub fn compute(&self) -> Result<RoiResult> {
        if self.lost_hours == 0.0 && self.productivity == 0.0 && self.therapy == 0.0 {
            return Err(CalmError::InvalidInput {
                field: "roi",
                details: EMPTY_INPUT_MESSAGE.to_string(),
            });
        }
        let cost = self.productivity
            + HOURLY_VALUE * self.lost_hours * WEEKS
            + IMPACT_COST * self.relationship
            + IMPACT_COST * self.health;
        let benefit = RECOVERY * cost;
        let roi_percent = if self.therapy > 0.0 {
            (benefit - self.therapy) / self.therapy * 100.0
        } else {
            0.0
        };
        Ok(RoiResult {
            cost,
            benefit,
            roi_percent,
        })
    }
}

/// Mexican-Spanish number format: comma thousands, up to three decimals.
#[must_use]
pub fn format_es_mx(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[derive(Debug, Default)]
pub struct Roi {
    wired: bool,
    last: Option<RoiResult>,
}

impl Roi {
    #[must_use]
    pub fn last(&self) -> Option<&RoiResult> {
        self.last.as_ref()
    }

    /// Calculate button: read the inputs, write the three result fields.
    pub fn calculate(&mut self, page: &mut dyn Page) -> Result<RoiResult> {
        let result = RoiInputs::from_page(page).compute()?;
        page.set_text(ROI_TOTAL_COST, &result.cost_label());
        page.set_text(ROI_BENEFIT, &result.benefit_label());
        page.set_text(ROI_PERCENT, &result.roi_label());
        page.add_class(ROI_RESULT, SHOW);
        self.last = Some(result);
        Ok(result)
    }
}

impl Widget for Roi {
    fn name(&self) -> &'static str {
        "roi"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if let Some(skip) = require_regions(page, &[ROI_CALCULATE]) {
            return Ok(skip);
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::layout::site_page;

    #[test]
    fn computes_cost_benefit_and_roi() {
        let inputs = RoiInputs::normalised(Some(5.0), Some(1000.0), Some(2.0), Some(3.0), Some(1500.0));
        let r = inputs.compute().unwrap();
        // 1000 + 200*5*4 + 150*2 + 150*3
        assert!((r.cost - 5750.0).abs() < 1e-9);
        assert!((r.benefit - 4025.0).abs() < 1e-9);
        assert_eq!(r.roi_label(), "168%");
        assert_eq!(r.cost_label(), "$5,750 MXN");
        assert_eq!(r.benefit_label(), "$4,025 MXN");
    }

    #[test]
    fn impact_scores_floor_at_one() {
        let inputs = RoiInputs::normalised(Some(1.0), None, Some(0.0), Some(-4.0), None);
        assert_eq!(inputs.relationship, 1.0);
        assert_eq!(inputs.health, 1.0);
        let r = inputs.compute().unwrap();
        assert!((r.cost - 1100.0).abs() < 1e-9);
        assert_eq!(r.roi_percent, 0.0);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let inputs = RoiInputs::normalised(None, Some(-10.0), Some(5.0), Some(5.0), None);
        let err = inputs.compute().unwrap_err();
        assert!(err.to_string().contains(EMPTY_INPUT_MESSAGE));
    }

    #[test]
    fn es_mx_formatting() {
        assert_eq!(format_es_mx(0.0), "0");
        assert_eq!(format_es_mx(999.0), "999");
        assert_eq!(format_es_mx(1234.5), "1,234.5");
        assert_eq!(format_es_mx(1_234_567.891_2), "1,234,567.891");
        assert_eq!(format_es_mx(-2500.0), "-2,500");
    }

    #[test]
    fn page_round_trip() {
        let mut page = site_page();
        let mut roi = Roi::default();
        roi.init(&mut page).unwrap();
        page.set_text(ROI_LOST_HOURS, "2");
        page.set_text(ROI_PRODUCTIVITY, "abc");
        page.set_text(ROI_THERAPY, "1000");
        let r = roi.calculate(&mut page).unwrap();
        assert!((r.cost - 1900.0).abs() < 1e-9);
        assert_eq!(page.text(ROI_TOTAL_COST).as_deref(), Some("$1,900 MXN"));
        assert_eq!(page.text(ROI_BENEFIT).as_deref(), Some("$1,330 MXN"));
        assert_eq!(page.text(ROI_PERCENT).as_deref(), Some("33%"));
        assert!(page.has_class(ROI_RESULT, SHOW));
    }

    #[test]
    fn second_init_keeps_last_result() {
        let mut page = site_page();
        let mut roi = Roi::default();
        assert_eq!(roi.init(&mut page).unwrap(), WidgetStatus::Ready);
        page.set_text(ROI_THERAPY, "1000");
        let first = roi.calculate(&mut page).unwrap();
        assert_eq!(roi.init(&mut page).unwrap(), WidgetStatus::Ready);
        assert!(roi.wired);
        assert_eq!(roi.last, Some(first));
        assert!(page.has_class(ROI_RESULT, SHOW));
    }
}
