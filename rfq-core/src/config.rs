//! Configuration constants and the injected quote profile.

use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Offer number used when none is given.
pub const DEFAULT_OFFER_NUMBER: &str = "41260018";

/// Suffix appended to the offer number in output file names.
pub const OUTPUT_FILE_SUFFIX: &str = "_NRL";

/// Rows linked from the fiber sheet to the sensor wavelength table.
pub const LINKED_FBG_ROWS: usize = 20;

/// First row (1-based) of the wavelength table on the sensor sheet.
pub const SENSOR_TABLE_FIRST_ROW: u32 = 38;

/// Last row (1-based) of an xlsx worksheet.
const XLSX_MAX_ROW: u32 = 1_048_576;

/// Largest grating count whose wavelength table still fits on the sensor sheet.
pub const MAX_FBG_COUNT: usize = (XLSX_MAX_ROW - SENSOR_TABLE_FIRST_ROW + 1) as usize;

/// First row (1-based) of the wavelength table on the fiber sheet.
pub const FIBER_TABLE_FIRST_ROW: u32 = 31;

/// Sheet names, in workbook order.
pub const FIBER_SHEET: &str = "Fiber Specification";
pub const SENSOR_SHEET: &str = "Sensor Specification";
pub const DEFINITIONS_SHEET: &str = "Definitions";
pub const DRAWINGS_SHEET: &str = "Drawings";

/// Sensor configurations offered on the drawing sheet, in drawing order (index 3..=6).
pub const SENSOR_CONFIGURATIONS: [&str; 4] = [
    "Capillary without Tube",
    "Capillary with Tube",
    "Fiber Only",
    "Fiber with Tube",
];

/// Full configuration injected into a generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub company: CompanyProfile,
    pub pricing: Pricing,
    pub defaults: QuoteDefaults,
    pub catalog: FiberCatalog,
}

impl QuoteConfig {
    /// Load a profile from a JSON file. Missing sections keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QuoteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| QuoteError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Legal and banking identity of the issuing company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub managing_director: String,
    pub court: String,
    pub hrb: String,
    pub eori: String,
    pub tax_no: String,
    pub vat: String,
    pub finance_office: String,
    pub bank: String,
    pub iban: String,
    pub swift: String,
    /// Banner line at the top of the sensor sheet.
    pub sensor_sheet_banner: String,
    /// Banner line at the top of the fiber sheet.
    pub fiber_sheet_banner: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "engionic Femto Gratings GmbH".into(),
            address: "Am Stollen 19b".into(),
            city: "38640 Goslar".into(),
            country: "Germany".into(),
            phone: "+49 30 628873 30".into(),
            email: "femto-gratings@engionic.de".into(),
            website: "www.engionic-femto-gratings.de".into(),
            managing_director: "Tobias Schenk".into(),
            court: "Local court Braunschweig".into(),
            hrb: "HRB 204454".into(),
            eori: "DE764032941655549".into(),
            tax_no: "2321/208/31038".into(),
            vat: "DE815483481".into(),
            finance_office: "Finance Office Goslar".into(),
            bank: "Commerzbank AG".into(),
            iban: "DE68 1004 0000 0573 6434 00".into(),
            swift: "COBADEFFXXX".into(),
            sensor_sheet_banner:
                "engionic Fiber Optics GmbH - Ernst-Lau-Straße 8 - 07745 Jena - Germany".into(),
            fiber_sheet_banner: "engionic Femto Gratings GmbH - Am Stollen 19B - 38640 Goslar"
                .into(),
        }
    }
}

impl CompanyProfile {
    /// Single-line sender address shown above the customer block.
    pub fn address_line(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.name, self.address, self.city, self.country
        )
    }
}

/// Line-item pricing. Not derived from the specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub unit_price: f64,
    pub quantity: u32,
    pub customs: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            unit_price: 220.64,
            quantity: 10,
            customs: 60.00,
        }
    }
}

impl Pricing {
    /// Value of the line item (quantity times unit price).
    pub fn total_product(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    /// Line item plus customs declaration.
    pub fn net_amount(&self) -> f64 {
        self.total_product() + self.customs
    }
}

/// Fixed texts of the offer that are not part of the customer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteDefaults {
    pub customer_number: String,
    pub agent: String,
    pub customer_country: String,
    pub template_version: String,
    pub fbg_remarks: String,
    pub fiber_provided_by: String,
    pub offer_validity: String,
    pub shipping_timeframe: String,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            customer_number: "20797".into(),
            agent: "Andrew Gillooly".into(),
            customer_country: "USA".into(),
            template_version: "V1.14".into(),
            fbg_remarks: "Kein Faserwechsel ohne Absprache; Toleranz erstes FBG +/-2mm".into(),
            fiber_provided_by: "eFG".into(),
            offer_validity: "30 days".into(),
            shipping_timeframe: "TBD".into(),
        }
    }
}

/// A catalog cell: the template mixes numbers and text in the same columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CatalogValue {
    fn from(value: f64) -> Self {
        CatalogValue::Number(value)
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        CatalogValue::Text(value.to_string())
    }
}

/// One row of the fiber lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberType {
    pub name: String,
    pub core_type: String,
    pub mode_field: CatalogValue,
    pub cladding: CatalogValue,
    pub coating: String,
    pub manufacturer: String,
    pub itu_t: String,
}

impl FiberType {
    fn new(
        name: &str,
        core_type: &str,
        mode_field: impl Into<CatalogValue>,
        cladding: impl Into<CatalogValue>,
        coating: &str,
        manufacturer: &str,
        itu_t: &str,
    ) -> Self {
        Self {
            name: name.into(),
            core_type: core_type.into(),
            mode_field: mode_field.into(),
            cladding: cladding.into(),
            coating: coating.into(),
            manufacturer: manufacturer.into(),
            itu_t: itu_t.into(),
        }
    }

    /// Cells of this record in lookup-table column order.
    pub fn cells(&self) -> [CatalogValue; 7] {
        [
            CatalogValue::Text(self.name.clone()),
            CatalogValue::Text(self.core_type.clone()),
            self.mode_field.clone(),
            self.cladding.clone(),
            CatalogValue::Text(self.coating.clone()),
            CatalogValue::Text(self.manufacturer.clone()),
            CatalogValue::Text(self.itu_t.clone()),
        ]
    }
}

/// Reference lists written to the definitions sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberCatalog {
    pub fiber_types: Vec<FiberType>,
    pub contacts: Vec<String>,
    pub provided_by: Vec<String>,
    pub femto_plus: Vec<String>,
}

impl FiberCatalog {
    /// Find a fiber type by its exact name.
    pub fn find(&self, name: &str) -> Option<&FiberType> {
        self.fiber_types.iter().find(|f| f.name == name)
    }
}

impl Default for FiberCatalog {
    fn default() -> Self {
        #[rustfmt::skip]
        let fiber_types = vec![
            FiberType::new("SMF-28 Ultra", "Single Mode", 10.4, 125.0, "Acrylate", "Corning", "G.657.A1"),
            FiberType::new("SMF-28 Ultra 200", "Single Mode", 10.4, 125.0, "Acrylate", "Corning", "G.657.A1"),
            FiberType::new("SM1330-E9/125PI", "Single Mode", "10,4", "125", "Polyimide", "J-Fiber", "-"),
            FiberType::new("SM1500SC(7/80)P", "Pure Core", "6,7 - 7,6", "80", "Polyimide", "Fibercore", "-"),
            FiberType::new("SM1250BI(9.8/125)P", "Bend Insensitive", "9 - 10,6", "125", "Polyimide", "Fibercore", "-"),
            FiberType::new("SM1250SC(9/125)", "Pure Core", "8,3 - 9,6", "125", "Acrylate", "Fibercore", "-"),
            FiberType::new("SM1250SC(9/125)P", "Pure Core", "8,3 - 9,6", "125", "Polyimide", "Fibercore", "-"),
            FiberType::new("SM1250SC(10/125)P", "Pure Core", "9,2 - 10,8", 125.0, "Polyimide", "Fibercore", "-"),
            FiberType::new("IXF-RAD-SM-1550-014-PI", "Radiation Hard", "8 - 10", "125", "Polyimide", "iXblue", "-"),
            FiberType::new("SMF-60-MTDA-125-1", "Pure Core", "9,3 - 10,7", "125", "Acrylate", "Verrillon", "-"),
            FiberType::new("Ormocer", "Single Mode", "-", "125", "Ormocer", "J-Fiber", "-"),
            FiberType::new("Single Mode Acrylate", "Single Mode", "-", "-", "Acrylate", "-", "-"),
            FiberType::new("Single Mode PI", "Single Mode", "-", "-", "Polyimide", "-", "-"),
            FiberType::new("Pure Core PI", "Pure Core", "-", "-", "Polyimide", "-", "-"),
            FiberType::new("Other (see Remarks)", "-", "-", "-", "-", "-", "-"),
        ];

        #[rustfmt::skip]
        let contacts = [
            "Friedrich", "Gillooly", "Gong", "Kampling", "Reif", "Vasileiou", "Vouilleme",
            "Yang", "Hoffmann",
        ];

        Self {
            fiber_types,
            contacts: contacts.iter().map(|c| c.to_string()).collect(),
            provided_by: vec!["eFG".into(), "customer".into()],
            femto_plus: vec!["yes".into(), "no".into()],
        }
    }
}
