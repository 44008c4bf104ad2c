//! Email templates for alert intents
//!
//! A fixed enum-keyed table: each alert kind maps to a subject, a body
//! renderer, and the payload fields that body needs. The table is validated
//! at construction so a kind can never reach dispatch without a template.

use super::{AlertIntent, AlertKind};

/// A rendered alert email, ready for the mail transport
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAlert {
    pub subject: String,
    pub html: String,
}

#[derive(Clone, Copy)]
struct AlertTemplate {
    kind: AlertKind,
    subject: &'static str,
    /// Payload fields the body reads; rendering refuses when any is missing
    required: &'static [&'static str],
    render_body: fn(&AlertIntent) -> String,
}

/// The fixed template table
#[derive(Clone)]
pub struct TemplateTable {
    templates: [AlertTemplate; 3],
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateTable {
    pub fn new() -> Self {
        let table = Self {
            templates: [
                AlertTemplate {
                    kind: AlertKind::HighConsumption,
                    subject: "⚡ High Energy Consumption Alert",
                    required: &["consumption", "percentage"],
                    render_body: render_high_consumption,
                },
                AlertTemplate {
                    kind: AlertKind::AnomalyDetected,
                    subject: "🔍 Energy Usage Anomaly Detected",
                    required: &["consumption", "expected"],
                    render_body: render_anomaly_detected,
                },
                AlertTemplate {
                    kind: AlertKind::CostThreshold,
                    subject: "💰 Energy Cost Threshold Exceeded",
                    required: &["cost", "threshold"],
                    render_body: render_cost_threshold,
                },
            ],
        };

        // Every kind must have exactly one template
        debug_assert!(AlertKind::ALL
            .iter()
            .all(|kind| table.templates.iter().filter(|t| t.kind == *kind).count() == 1));

        table
    }

    /// Render the template for an intent's kind
    ///
    /// Returns None when the intent's payload is missing a field the template
    /// needs; the caller treats that as "nothing to send".
    pub fn render(&self, intent: &AlertIntent) -> Option<RenderedAlert> {
        let template = self.templates.iter().find(|t| t.kind == intent.kind)?;

        if !template
            .required
            .iter()
            .all(|field| intent.payload.contains_key(*field))
        {
            return None;
        }

        Some(RenderedAlert {
            subject: template.subject.to_string(),
            html: (template.render_body)(intent),
        })
    }
}

fn render_high_consumption(intent: &AlertIntent) -> String {
    let consumption = intent.field("consumption").unwrap_or(0.0);
    let percentage = intent.field("percentage").unwrap_or(0.0);
    format!(
        "<h2>Energy Consumption Alert</h2>\
         <p>Your predicted energy consumption is <strong>{} kWh</strong>, \
         which is {}% above normal.</p>\
         <p>Recommendations:</p>\
         <ul>\
         <li>Check AC temperature settings</li>\
         <li>Turn off unused devices</li>\
         <li>Consider peak hour usage</li>\
         </ul>",
        consumption, percentage
    )
}

fn render_anomaly_detected(intent: &AlertIntent) -> String {
    let consumption = intent.field("consumption").unwrap_or(0.0);
    let expected = intent.field("expected").unwrap_or(0.0);
    format!(
        "<h2>Unusual Energy Pattern Detected</h2>\
         <p>We detected an unusual energy consumption pattern in your recent usage.</p>\
         <p>Consumption: <strong>{} kWh</strong></p>\
         <p>Expected: <strong>{} kWh</strong></p>",
        consumption, expected
    )
}

fn render_cost_threshold(intent: &AlertIntent) -> String {
    let cost = intent.field("cost").unwrap_or(0.0);
    let threshold = intent.field("threshold").unwrap_or(0.0);
    format!(
        "<h2>Cost Alert</h2>\
         <p>Your estimated energy cost for today is <strong>${}</strong>.</p>\
         <p>This exceeds your threshold of ${}.</p>",
        cost, threshold
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_intent(kind: AlertKind, fields: &[(&str, f64)]) -> AlertIntent {
        fields
            .iter()
            .fold(AlertIntent::new(kind), |intent, (name, value)| {
                intent.with_field(name, *value)
            })
    }

    #[test]
    fn test_every_kind_has_a_template() {
        let table = TemplateTable::new();
        for kind in AlertKind::ALL {
            let intent = match kind {
                AlertKind::HighConsumption => complete_intent(
                    kind,
                    &[("consumption", 250.0), ("percentage", 67.0)],
                ),
                AlertKind::AnomalyDetected => complete_intent(
                    kind,
                    &[("consumption", 400.0), ("expected", 150.0)],
                ),
                AlertKind::CostThreshold => {
                    complete_intent(kind, &[("cost", 60.0), ("threshold", 50.0)])
                }
            };
            assert!(table.render(&intent).is_some(), "no template for {}", kind);
        }
    }

    #[test]
    fn test_high_consumption_body() {
        let table = TemplateTable::new();
        let intent = AlertIntent::new(AlertKind::HighConsumption)
            .with_field("consumption", 250.0)
            .with_field("percentage", 67.0);

        let rendered = table.render(&intent).unwrap();
        assert_eq!(rendered.subject, "⚡ High Energy Consumption Alert");
        assert!(rendered.html.contains("<strong>250 kWh</strong>"));
        assert!(rendered.html.contains("67% above normal"));
    }

    #[test]
    fn test_cost_threshold_body() {
        let table = TemplateTable::new();
        let intent = AlertIntent::new(AlertKind::CostThreshold)
            .with_field("cost", 60.5)
            .with_field("threshold", 50.0);

        let rendered = table.render(&intent).unwrap();
        assert!(rendered.html.contains("$60.5"));
        assert!(rendered.html.contains("threshold of $50"));
    }

    #[test]
    fn test_missing_required_field_refuses_to_render() {
        let table = TemplateTable::new();
        let intent = AlertIntent::new(AlertKind::HighConsumption).with_field("consumption", 250.0);
        assert!(table.render(&intent).is_none());
    }
}
