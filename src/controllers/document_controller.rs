use chrono::Utc;
use rust_decimal::Decimal;

use crate::dto::document_dto::DocumentRequest;
use crate::models::cost::{CostQuery, CostSummary, ReturnCost, VehicleCost, MAX_COST_LIMIT};
use crate::models::customer::Customer;
use crate::models::dealer::Dealer;
use crate::models::test_drive::TestDriveEntry;
use crate::repositories::DealerScope;
use crate::services::pdf_service::{render_pdf, Block, DocumentLayout};
use crate::utils::errors::{not_found_error, AppError};

/// PDF generado junto con su nombre de fichero
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentController {
    scope: DealerScope,
}

impl DocumentController {
    pub fn new(scope: DealerScope) -> Self {
        Self { scope }
    }

    pub async fn export(&self, request: DocumentRequest) -> Result<RenderedDocument, AppError> {
        let dealer = self.scope.dealer();
        let (layout, suffix) = match &request {
            DocumentRequest::TestDriveAgreement { test_drive_id } => {
                let entry = self
                    .scope
                    .find_test_drive(*test_drive_id)
                    .await?
                    .ok_or_else(|| not_found_error("Test drive", &test_drive_id.to_string()))?;
                (test_drive_agreement(dealer, &entry), test_drive_id.to_string())
            }
            DocumentRequest::CustomerProfile { customer_id } => {
                let customer = self
                    .scope
                    .find_customer(*customer_id)
                    .await?
                    .ok_or_else(|| not_found_error("Customer", &customer_id.to_string()))?;
                (customer_profile(dealer, &customer), customer_id.to_string())
            }
            DocumentRequest::CostReport => {
                let query = CostQuery {
                    limit: MAX_COST_LIMIT,
                    ..CostQuery::default()
                };
                let vehicle = CostSection {
                    rows: self.scope.list_vehicle_costs(&query).await?,
                    summary: self.scope.vehicle_cost_summary(&query).await?,
                };
                let returns = CostSection {
                    rows: self.scope.list_return_costs(&query).await?,
                    summary: self.scope.return_cost_summary(&query).await?,
                };
                let today = Utc::now().date_naive().to_string();
                (cost_report(dealer, &vehicle, &returns, &today), today)
            }
        };

        let bytes = tokio::task::spawn_blocking(move || render_pdf(&layout))
            .await
            .map_err(|e| AppError::Internal(format!("PDF render task failed: {}", e)))??;

        let filename = format!("{}-{}.pdf", request.kind(), suffix);
        tracing::info!("📄 Documento {} generado ({} bytes)", filename, bytes.len());

        Ok(RenderedDocument { filename, bytes })
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

fn dealer_fields(dealer: &Dealer) -> Block {
    Block::Fields(vec![
        ("Business".into(), dealer.business_name.clone()),
        ("Address".into(), or_dash(dealer.address.as_deref())),
        ("Phone".into(), or_dash(dealer.phone.as_deref())),
        ("Email".into(), or_dash(dealer.contact_email.as_deref())),
    ])
}

fn generated_footer(dealer: &Dealer) -> String {
    format!(
        "Generated {} for {}",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        dealer.business_name
    )
}

pub(crate) fn test_drive_agreement(dealer: &Dealer, entry: &TestDriveEntry) -> DocumentLayout {
    let mut layout = DocumentLayout::new("Test Drive Agreement")
        .subtitle(dealer.business_name.clone())
        .section("Dealer", vec![dealer_fields(dealer)])
        .section(
            "Driver",
            vec![Block::Fields(vec![
                ("Name".into(), entry.customer_name.clone()),
                ("Email".into(), entry.customer_email.clone()),
                ("Phone".into(), or_dash(entry.customer_phone.as_deref())),
            ])],
        )
        .section(
            "Vehicle",
            vec![Block::Fields(vec![
                ("Vehicle".into(), entry.vehicle_label()),
                ("Registration".into(), or_dash(entry.vehicle_registration.as_deref())),
                ("Stock number".into(), or_dash(entry.vehicle_stock_number.as_deref())),
            ])],
        )
        .section(
            "Appointment",
            vec![Block::Fields(vec![
                ("Date".into(), entry.drive_date.format("%d/%m/%Y").to_string()),
                ("Time".into(), entry.drive_time.format("%H:%M").to_string()),
                ("Duration".into(), format!("{} minutes", entry.duration_minutes)),
                ("Status".into(), entry.status.to_string()),
            ])],
        );

    if let Some(notes) = &entry.notes {
        layout = layout.section("Notes", vec![Block::Paragraph(notes.clone())]);
    }

    layout
        .section(
            "Terms",
            vec![Block::Paragraph(
                "The driver confirms they hold a full, valid driving licence for this class of vehicle, \
                 will obey all traffic laws during the test drive, and accepts liability for fines and \
                 the policy excess in the event of damage caused while the vehicle is in their care."
                    .to_string(),
            )],
        )
        .section(
            "Signatures",
            vec![Block::Fields(vec![
                ("Driver".into(), "______________________________".into()),
                ("Dealer representative".into(), "______________________________".into()),
                ("Date".into(), "____ / ____ / ________".into()),
            ])],
        )
        .footer(generated_footer(dealer))
}

pub(crate) fn customer_profile(dealer: &Dealer, customer: &Customer) -> DocumentLayout {
    let mut layout = DocumentLayout::new("Customer Profile")
        .subtitle(customer.full_name())
        .section(
            "Contact",
            vec![Block::Fields(vec![
                ("Name".into(), customer.full_name()),
                ("Email".into(), customer.email.clone()),
                ("Phone".into(), or_dash(customer.phone.as_deref())),
                ("Address".into(), or_dash(customer.address_line.as_deref())),
                ("City".into(), or_dash(customer.city.as_deref())),
                ("Postcode".into(), or_dash(customer.postcode.as_deref())),
            ])],
        )
        .section(
            "Status and consent",
            vec![Block::Fields(vec![
                ("Status".into(), customer.status.to_string()),
                ("Marketing consent".into(), yes_no(customer.marketing_consent)),
                ("Sales consent".into(), yes_no(customer.sales_consent)),
                ("GDPR consent".into(), yes_no(customer.gdpr_consent)),
                (
                    "Consent date".into(),
                    customer
                        .consent_date
                        .map(|d| d.format("%d/%m/%Y").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                ("Customer since".into(), customer.created_at.format("%d/%m/%Y").to_string()),
            ])],
        );

    if !customer.tags.0.is_empty() {
        layout = layout.section("Tags", vec![Block::Paragraph(customer.tags.0.join(", "))]);
    }

    if let Some(extra) = customer.custom_fields.0.as_object().filter(|o| !o.is_empty()) {
        let pairs = extra
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        layout = layout.section("Additional details", vec![Block::Fields(pairs)]);
    }

    if let Some(notes) = &customer.notes {
        layout = layout.section("Notes", vec![Block::Paragraph(notes.clone())]);
    }

    layout.footer(generated_footer(dealer))
}

/// Filas listadas de un tipo de coste junto con el agregado de todas ellas
pub(crate) struct CostSection<T> {
    pub rows: Vec<T>,
    pub summary: CostSummary,
}

impl<T> CostSection<T> {
    fn summary_line(&self) -> String {
        format!("{} ({} entries)", money(self.summary.total), self.summary.entries)
    }

    /// Aviso cuando la tabla no contiene todas las filas del total
    fn truncation_note(&self) -> Option<Block> {
        let listed = self.rows.len() as i64;
        (listed < self.summary.entries).then(|| {
            Block::Paragraph(format!(
                "Showing the newest {} of {} entries. Totals include every entry.",
                listed, self.summary.entries
            ))
        })
    }
}

pub(crate) fn cost_report(
    dealer: &Dealer,
    vehicle: &CostSection<VehicleCost>,
    returns: &CostSection<ReturnCost>,
    today: &str,
) -> DocumentLayout {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());

    let vehicle_rows = vehicle
        .rows
        .iter()
        .map(|c| {
            vec![
                c.stock_number.clone(),
                or_dash(c.vehicle_description.as_deref()),
                c.category.to_string(),
                or_dash(c.description.as_deref()),
                date(c.incurred_on),
                money(c.amount),
            ]
        })
        .collect();

    let return_rows = returns
        .rows
        .iter()
        .map(|c| {
            vec![
                c.stock_number.clone(),
                or_dash(c.vehicle_description.as_deref()),
                or_dash(c.reason.as_deref()),
                date(c.returned_on),
                money(c.amount),
            ]
        })
        .collect();

    let vehicle_table = Block::Table {
        columns: vec![
            ("Stock".into(), 25.0),
            ("Vehicle".into(), 40.0),
            ("Category".into(), 25.0),
            ("Description".into(), 40.0),
            ("Date".into(), 22.0),
            ("Amount".into(), 22.0),
        ],
        rows: vehicle_rows,
    };
    let return_table = Block::Table {
        columns: vec![
            ("Stock".into(), 25.0),
            ("Vehicle".into(), 45.0),
            ("Reason".into(), 60.0),
            ("Date".into(), 22.0),
            ("Amount".into(), 22.0),
        ],
        rows: return_rows,
    };

    DocumentLayout::new("Cost Report")
        .subtitle(format!("{} - {}", dealer.business_name, today))
        .section(
            "Summary",
            vec![Block::Fields(vec![
                ("Vehicle costs".into(), vehicle.summary_line()),
                ("Return costs".into(), returns.summary_line()),
                ("Combined".into(), money(vehicle.summary.total + returns.summary.total)),
            ])],
        )
        .section("Vehicle costs", vehicle.truncation_note().into_iter().chain([vehicle_table]).collect())
        .section("Return costs", returns.truncation_note().into_iter().chain([return_table]).collect())
        .footer(generated_footer(dealer))
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
