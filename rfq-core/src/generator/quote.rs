//! The PDF quote: letterhead, offer details, line items, totals and terms.

use super::format::{format_amount, format_date};
use super::QuoteDocumentGenerator;
use crate::error::Result;
use crate::pdf::{
    paginate, write_pdf, Align, DocumentInfo, Flowable, Font, PageGeometry, Paragraph,
    ParagraphStyle, Region, Rgb, Run, Table, TableCommand, TableStyle, VAlign, MM,
};

/// Paragraph styles of the quote.
struct QuoteStyles {
    normal: ParagraphStyle,
    small: ParagraphStyle,
    title: ParagraphStyle,
}

impl QuoteStyles {
    fn new() -> Self {
        Self {
            normal: ParagraphStyle::new(9.0).spacing(4.0, 4.0),
            small: ParagraphStyle::new(7.0).color(Rgb::GREY),
            title: ParagraphStyle::new(14.0).spacing(0.0, 10.0).bold(),
        }
    }
}

impl QuoteDocumentGenerator<'_> {
    /// Render the PDF quote in memory.
    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        let geometry = PageGeometry::a4(20.0);
        let story = self.quote_story();
        let pages = paginate(&story, &geometry);

        let info = DocumentInfo {
            title: format!("Offer No. {}", self.offer_number()),
            author: self.config().company.name.clone(),
            date: self.date(),
        };
        let bytes = write_pdf(&pages, &geometry, &info)?;
        tracing::debug!(
            offer = %self.offer_number(),
            pages = pages.len(),
            bytes = bytes.len(),
            "Rendered quote"
        );
        Ok(bytes)
    }

    /// Flowables of the quote, top to bottom.
    pub fn quote_story(&self) -> Vec<Flowable> {
        let styles = QuoteStyles::new();
        let company = &self.config().company;
        let spec = self.spec();
        let mut story = Vec::new();

        story.push(Flowable::Paragraph(Paragraph::rich(
            vec![
                Run::bold(company.name.as_str()),
                Run::plain(format!(
                    "\n{}\n{}\n{}\n{}\n{}",
                    company.address, company.city, company.phone, company.email, company.website
                )),
            ],
            styles.normal,
        )));
        story.push(Flowable::Spacer(10.0 * MM));

        story.push(Flowable::Paragraph(Paragraph::new(
            company.address_line(),
            styles.small,
        )));
        story.push(Flowable::Spacer(5.0 * MM));

        story.push(Flowable::Paragraph(Paragraph::new(
            spec.customer.as_str(),
            styles.normal,
        )));
        story.push(Flowable::Paragraph(Paragraph::new(
            spec.customer_country.as_str(),
            styles.normal,
        )));
        story.push(Flowable::Spacer(5.0 * MM));

        story.push(Flowable::Table(self.info_table()));
        story.push(Flowable::Spacer(10.0 * MM));

        story.push(Flowable::Paragraph(Paragraph::new(
            format!("Offer No. {}", self.offer_number()),
            styles.title,
        )));
        story.push(Flowable::Spacer(5.0 * MM));

        story.push(Flowable::Paragraph(Paragraph::new(
            format!("Dear {},", spec.customer_short()),
            styles.normal,
        )));
        story.push(Flowable::Spacer(3.0 * MM));
        story.push(Flowable::Paragraph(Paragraph::new(
            "We are happy to provide you the following non-binding offer subject to our general \
             terms and conditions of delivery and payment:",
            styles.normal,
        )));
        story.push(Flowable::Spacer(5.0 * MM));

        story.push(Flowable::Table(self.line_item_table()));
        story.push(Flowable::Table(self.totals_table()));
        story.push(Flowable::Spacer(10.0 * MM));

        for term in self.terms() {
            story.push(Flowable::Paragraph(Paragraph::new(term, styles.normal)));
        }
        story.push(Flowable::Spacer(20.0 * MM));

        story.push(Flowable::Table(self.footer_table()));
        story
    }

    fn info_table(&self) -> Table {
        let defaults = &self.config().defaults;
        let date = format_date(self.date());
        let order = format!(
            "{}x Conn. {}FBG arrays",
            self.config().pricing.quantity,
            self.spec().fbg_count()
        );

        Table::new(
            vec![
                vec!["Page:".to_string(), "1".to_string()],
                vec!["Customer No.:".to_string(), defaults.customer_number.clone()],
                vec!["Order No.:".to_string(), order],
                vec!["Agent:".to_string(), defaults.agent.clone()],
                vec!["Delivery date:".to_string(), date.clone()],
                vec!["Date:".to_string(), date],
            ],
            &[80.0, 120.0],
        )
        .style(
            TableStyle::new()
                .with(TableCommand::FontSize(Region::ALL, 9.0))
                .with(TableCommand::Align(Region::cols(0, 0), Align::Right))
                .with(TableCommand::Align(Region::cols(1, 1), Align::Left)),
        )
    }

    fn line_item_table(&self) -> Table {
        let pricing = &self.config().pricing;
        let description = format!(
            "{} FBG arrays with FC/APC connectors on both ends.\nSee spec sheet {}",
            self.spec().fbg_count(),
            self.offer_number()
        );

        Table::new(
            vec![
                vec![
                    "Item".to_string(),
                    "Qty.".to_string(),
                    "Unit".to_string(),
                    "Art.-No.".to_string(),
                    "Description".to_string(),
                    "Unit price\nEUR".to_string(),
                    "Value\nEUR".to_string(),
                ],
                vec![
                    "1".to_string(),
                    pricing.quantity.to_string(),
                    "pcs.".to_string(),
                    String::new(),
                    description,
                    format!("{:.4}", pricing.unit_price),
                    format_amount(pricing.total_product(), 2),
                ],
            ],
            &[30.0, 30.0, 30.0, 40.0, 150.0, 55.0, 55.0],
        )
        .style(
            TableStyle::new()
                .with(TableCommand::FontSize(Region::ALL, 9.0))
                .with(TableCommand::Align(Region::row(0), Align::Center))
                .with(TableCommand::Align(Region::new((0, 1), (1, -1)), Align::Center))
                .with(TableCommand::Align(Region::new((5, 1), (6, -1)), Align::Right))
                .with(TableCommand::Background(Region::row(0), Rgb::grey(0.9)))
                .with(TableCommand::Grid(Region::ALL, 0.5, Rgb::GREY))
                .with(TableCommand::VAlign(Region::ALL, VAlign::Middle)),
        )
    }

    fn totals_table(&self) -> Table {
        let pricing = &self.config().pricing;
        let net = format_amount(pricing.net_amount(), 2);
        let row = |label: &str, tax_free: &str, value: &str| {
            let mut cells = vec![String::new(); 7];
            cells[0] = label.to_string();
            cells[5] = tax_free.to_string();
            cells[6] = value.to_string();
            cells
        };

        Table::new(
            vec![
                row(
                    "plus Customs Declaration (Germany)",
                    "",
                    &format!("{:.2}", pricing.customs),
                ),
                row("Net amount", "", &net),
                row("tax free (NON-EU)", &net, ""),
                row("Total value", "", &net),
            ],
            &[150.0, 30.0, 30.0, 40.0, 40.0, 55.0, 55.0],
        )
        .style(
            TableStyle::new()
                .with(TableCommand::FontSize(Region::ALL, 9.0))
                .with(TableCommand::Align(Region::cols(5, 6), Align::Right))
                .with(TableCommand::LineAbove(Region::row(3), 1.0, Rgb::BLACK))
                .with(TableCommand::Font(Region::row(3), Font::HelveticaBold)),
        )
    }

    fn terms(&self) -> Vec<String> {
        let defaults = &self.config().defaults;
        vec![
            "Terms of payment: Payment in advance".to_string(),
            "Incoterms 2020: EXW".to_string(),
            String::new(),
            "Please return signed specification sheet with order.".to_string(),
            format!("This offer is valid until: {}", defaults.offer_validity),
            "All prices are net prices excluding shipping costs, VAT, taxes, customs and other \
             fees for exportation."
                .to_string(),
            "Notices of defect are only accepted within 14 days after delivery.".to_string(),
            "Goods with value > 5000€ will be shipped insured. Shipping costs will be borne by \
             the customer."
                .to_string(),
            "The commodities listed in this document are classified as dual-use items under \
             Council Regulation (EC) No 2021/821 [Annex I; list number 6A002D] by The German \
             Federal Office for Economic Affairs and Export Control (BAFA)."
                .to_string(),
            format!(
                "Prospective Shipping timeframe: {}",
                defaults.shipping_timeframe
            ),
        ]
    }

    fn footer_table(&self) -> Table {
        let company = &self.config().company;
        Table::new(
            vec![
                vec![
                    company.name.clone(),
                    format!("Managing Director: {}", company.managing_director),
                    company.finance_office.clone(),
                    "Bank details:".to_string(),
                ],
                vec![
                    company.court.clone(),
                    String::new(),
                    format!("Tax No.{}", company.tax_no),
                    company.bank.clone(),
                ],
                vec![
                    company.hrb.clone(),
                    format!("EORI: {}", company.eori),
                    format!("VAT {}", company.vat),
                    format!("IBAN: {}", company.iban),
                ],
                vec![
                    String::new(),
                    String::new(),
                    String::new(),
                    format!("SWIFT-BIC: {}", company.swift),
                ],
            ],
            &[100.0, 100.0, 100.0, 120.0],
        )
        .style(
            TableStyle::new()
                .with(TableCommand::FontSize(Region::ALL, 7.0))
                .with(TableCommand::TextColor(Region::ALL, Rgb::GREY))
                .with(TableCommand::LineAbove(Region::row(0), 0.5, Rgb::GREY))
                .with(TableCommand::TopPadding(Region::row(0), 5.0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::config::QuoteConfig;
    use crate::generator::QuoteDocumentGenerator;
    use crate::pdf::{paginate, Flowable, PageGeometry};
    use crate::spec::SpecFields;
    use chrono::NaiveDate;

    fn generator(config: &QuoteConfig) -> QuoteDocumentGenerator<'_> {
        QuoteDocumentGenerator::new(&SpecFields::new(), "41260018", config)
            .unwrap()
            .with_date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    }

    fn table_rows(story: &[Flowable], index: usize) -> Vec<Vec<String>> {
        story
            .iter()
            .filter_map(|f| match f {
                Flowable::Table(t) => Some(t.rows.clone()),
                _ => None,
            })
            .nth(index)
            .unwrap()
    }

    #[test]
    fn test_info_table() {
        let config = QuoteConfig::default();
        let rows = table_rows(&generator(&config).quote_story(), 0);
        assert_eq!(rows[1], vec!["Customer No.:", "20797"]);
        assert_eq!(rows[2], vec!["Order No.:", "10x Conn. 2FBG arrays"]);
        assert_eq!(rows[3], vec!["Agent:", "Andrew Gillooly"]);
        assert_eq!(rows[4][1], "02.03.2026");
        assert_eq!(rows[5][1], "02.03.2026");
    }

    #[test]
    fn test_line_item_and_totals() {
        let config = QuoteConfig::default();
        let story = generator(&config).quote_story();

        let items = table_rows(&story, 1);
        assert_eq!(items[1][1], "10");
        assert_eq!(items[1][5], "220.6400");
        assert_eq!(items[1][6], "2,206.40");
        assert!(items[1][4].ends_with("See spec sheet 41260018"));

        let totals = table_rows(&story, 2);
        assert_eq!(totals[0][6], "60.00");
        assert_eq!(totals[1][6], "2,266.40");
        assert_eq!(totals[2][5], "2,266.40");
        assert_eq!(totals[3][6], "2,266.40");
    }

    #[test]
    fn test_laid_out_text() {
        let config = QuoteConfig::default();
        let story = generator(&config).quote_story();
        let pages = paginate(&story, &PageGeometry::a4(20.0));
        assert!(pages.len() <= 2);
        let text: String = pages.iter().map(|p| p.text()).collect();
        assert!(text.contains("Offer No. 41260018"));
        assert!(text.contains("Dear NRL,"));
        assert!(text.contains("SWIFT-BIC: COBADEFFXXX"));
    }

    #[test]
    fn test_custom_pricing_flows_into_totals() {
        let mut config = QuoteConfig::default();
        config.pricing.unit_price = 1000.0;
        config.pricing.quantity = 3;
        let story = generator(&config).quote_story();
        let totals = table_rows(&story, 2);
        assert_eq!(totals[1][6], "3,060.00");
        let info = table_rows(&story, 0);
        assert_eq!(info[2][1], "3x Conn. 2FBG arrays");
    }
}
