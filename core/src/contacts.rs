use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HandoffError;

const OFFICE_HOURS: &str = "Mon–Fri, 9am–5pm";

/// A human point of contact attached to a handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
}

impl ContactRecord {
    fn office(name: &str, phone: &str, email: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            hours: OFFICE_HOURS.to_string(),
        }
    }

    fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
            ("hours", &self.hours),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Housing-subsidy programs that drive contact routing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum VoucherProgram {
    #[serde(rename = "CITYFHEPS")]
    CityFheps,
    #[serde(rename = "SECTION 8")]
    Section8,
    #[serde(rename = "HASA")]
    Hasa,
}

impl VoucherProgram {
    pub const ALL: [VoucherProgram; 3] = [Self::CityFheps, Self::Section8, Self::Hasa];

    /// Canonical directory key.
    pub fn as_str(self) -> &'static str {
        match self {
            VoucherProgram::CityFheps => "CITYFHEPS",
            VoucherProgram::Section8 => "SECTION 8",
            VoucherProgram::Hasa => "HASA",
        }
    }

    /// Parse free-form user input ("Section-8", "fheps", "H.A.S.A.").
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_program_name(raw)?;
        Self::ALL
            .into_iter()
            .find(|program| program.as_str() == normalized)
    }

    /// Programs whose discrimination cases may be routed to a borough office.
    fn routes_discrimination_by_borough(self) -> bool {
        matches!(self, VoucherProgram::CityFheps | VoucherProgram::Section8)
    }

    fn office_label(self) -> &'static str {
        match self {
            VoucherProgram::CityFheps => "CityFHEPS",
            VoucherProgram::Section8 => "NYCHA Section 8",
            VoucherProgram::Hasa => "HASA",
        }
    }
}

/// Collapse case, whitespace, punctuation and known synonyms onto a canonical
/// program key. Unknown programs come back as their compacted uppercase form.
pub fn normalize_program_name(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .flat_map(char::to_uppercase)
        .collect();
    if compact.is_empty() {
        return None;
    }

    let canonical = match compact.as_str() {
        "CITYFHEPS" | "CITYFHEP" | "FHEPS" | "FHEP" | "CFHEPS" => VoucherProgram::CityFheps,
        "SECTION8" | "SECTIONEIGHT" | "S8" | "SEC8" => VoucherProgram::Section8,
        "HASA" | "HIVAIDSERVICES" | "HIVAIDSERVICESADMIN" | "HIVAIDSSERVICES"
        | "HIVAIDSSERVICESADMIN" => VoucherProgram::Hasa,
        _ => return Some(compact),
    };
    Some(canonical.as_str().to_string())
}

/// The five NYC boroughs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Bronx,
    Queens,
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Self::Manhattan,
        Self::Brooklyn,
        Self::Bronx,
        Self::Queens,
        Self::StatenIsland,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Borough::Manhattan => "manhattan",
            Borough::Brooklyn => "brooklyn",
            Borough::Bronx => "bronx",
            Borough::Queens => "queens",
            Borough::StatenIsland => "staten_island",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Bronx => "Bronx",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Lower-case, join words with `_`, then match the closed key set.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        Self::ALL
            .into_iter()
            .find(|borough| borough.as_str() == key)
    }
}

/// Contacts for one voucher program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramOffices {
    pub default: ContactRecord,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub boroughs: BTreeMap<Borough, ContactRecord>,
}

/// Offices handling discrimination complaints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscriminationOffices {
    pub default: ContactRecord,
    pub legal: ContactRecord,
    pub fair_housing: ContactRecord,
}

/// Immutable routing table from (program, borough, case kind) to a contact.
///
/// Every program is a required field, so resolution never hits a missing key.
/// The JSON shape mirrors the product's contact sheet:
/// `{"default", "CITYFHEPS", "SECTION 8", "HASA", "discrimination"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactDirectory {
    pub default: ContactRecord,
    #[serde(rename = "CITYFHEPS")]
    pub cityfheps: ProgramOffices,
    #[serde(rename = "SECTION 8")]
    pub section8: ProgramOffices,
    #[serde(rename = "HASA")]
    pub hasa: ProgramOffices,
    pub discrimination: DiscriminationOffices,
}

static BUILTIN_DIRECTORY: LazyLock<ContactDirectory> = LazyLock::new(builtin_directory);

impl Default for ContactDirectory {
    fn default() -> Self {
        BUILTIN_DIRECTORY.clone()
    }
}

impl ContactDirectory {
    /// The process-wide directory compiled into the binary.
    pub fn builtin() -> &'static ContactDirectory {
        &BUILTIN_DIRECTORY
    }

    /// Load a directory from JSON, rejecting unknown program or borough keys
    /// and records with blank fields.
    pub fn from_json(raw: &str) -> Result<Self, HandoffError> {
        let directory: ContactDirectory = serde_json::from_str(raw)
            .map_err(|e| HandoffError::InvalidConfiguration(e.to_string()))?;
        directory.validate()?;
        Ok(directory)
    }

    pub fn program_offices(&self, program: VoucherProgram) -> &ProgramOffices {
        match program {
            VoucherProgram::CityFheps => &self.cityfheps,
            VoucherProgram::Section8 => &self.section8,
            VoucherProgram::Hasa => &self.hasa,
        }
    }

    pub fn fair_housing(&self) -> &ContactRecord {
        &self.discrimination.fair_housing
    }

    /// Resolve free-form program and borough names to a contact.
    pub fn resolve(
        &self,
        program: Option<&str>,
        borough: Option<&str>,
        is_discrimination: bool,
        use_borough_office: bool,
    ) -> ContactRecord {
        self.resolve_keys(
            program.and_then(VoucherProgram::parse),
            borough.and_then(Borough::parse),
            is_discrimination,
            use_borough_office,
        )
    }

    /// Resolve already-parsed keys. Total over every combination.
    pub fn resolve_keys(
        &self,
        program: Option<VoucherProgram>,
        borough: Option<Borough>,
        is_discrimination: bool,
        use_borough_office: bool,
    ) -> ContactRecord {
        if is_discrimination {
            return self.resolve_discrimination(program, borough, use_borough_office);
        }

        let Some(program) = program else {
            tracing::debug!(route = "general_default", "resolved handoff contact");
            return self.default.clone();
        };
        let offices = self.program_offices(program);
        match borough.and_then(|b| offices.boroughs.get(&b)) {
            Some(office) => {
                tracing::debug!(
                    route = "program_borough",
                    program = program.as_str(),
                    "resolved handoff contact"
                );
                office.clone()
            }
            None => {
                tracing::debug!(
                    route = "program_default",
                    program = program.as_str(),
                    "resolved handoff contact"
                );
                offices.default.clone()
            }
        }
    }

    fn resolve_discrimination(
        &self,
        program: Option<VoucherProgram>,
        borough: Option<Borough>,
        use_borough_office: bool,
    ) -> ContactRecord {
        if program == Some(VoucherProgram::Hasa) {
            tracing::debug!(route = "discrimination_legal", "resolved handoff contact");
            return self.discrimination.legal.clone();
        }

        if use_borough_office {
            if let Some(office) = self.discrimination_borough_office(program, borough) {
                return office;
            }
        }

        tracing::debug!(route = "discrimination_default", "resolved handoff contact");
        self.discrimination.default.clone()
    }

    /// The program's borough office, named for a discrimination handoff.
    fn discrimination_borough_office(
        &self,
        program: Option<VoucherProgram>,
        borough: Option<Borough>,
    ) -> Option<ContactRecord> {
        let (program, borough) = program.zip(borough)?;
        if !program.routes_discrimination_by_borough() {
            return None;
        }
        let office = self.program_offices(program).boroughs.get(&borough)?;
        tracing::debug!(
            route = "discrimination_borough",
            program = program.as_str(),
            borough = borough.as_str(),
            "resolved handoff contact"
        );
        Some(ContactRecord {
            name: format!(
                "{} {} Office",
                borough.display_name(),
                program.office_label()
            ),
            ..office.clone()
        })
    }

    fn validate(&self) -> Result<(), HandoffError> {
        let mut records: Vec<(String, &ContactRecord)> = vec![
            ("default".to_string(), &self.default),
            (
                "discrimination.default".to_string(),
                &self.discrimination.default,
            ),
            (
                "discrimination.legal".to_string(),
                &self.discrimination.legal,
            ),
            (
                "discrimination.fair_housing".to_string(),
                &self.discrimination.fair_housing,
            ),
        ];
        for program in VoucherProgram::ALL {
            let offices = self.program_offices(program);
            records.push((
                format!("{}.default", program.as_str()),
                &offices.default,
            ));
            for (borough, office) in &offices.boroughs {
                records.push((
                    format!("{}.boroughs.{}", program.as_str(), borough.as_str()),
                    office,
                ));
            }
        }

        for (path, record) in records {
            if let Some(field) = record.missing_field() {
                return Err(HandoffError::InvalidConfiguration(format!(
                    "{path}.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn borough_offices(entries: [(Borough, ContactRecord); 5]) -> BTreeMap<Borough, ContactRecord> {
    entries.into_iter().collect()
}

fn builtin_directory() -> ContactDirectory {
    use Borough::*;

    ContactDirectory {
        default: ContactRecord::office(
            "HRA General Support",
            "718-557-1399",
            "info@hra.nyc.gov",
            "109 E 16th St, Manhattan",
        ),
        cityfheps: ProgramOffices {
            default: ContactRecord::office(
                "CityFHEPS Central Office",
                "929-221-0047",
                "cityfheps@hra.nyc.gov",
                "109 E 16th St, Manhattan",
            ),
            boroughs: borough_offices([
                (
                    Manhattan,
                    ContactRecord::office(
                        "Manhattan CityFHEPS Office",
                        "212-331-4640",
                        "manhattan.hra@nyc.gov",
                        "109 E 16th St, Manhattan",
                    ),
                ),
                (
                    Brooklyn,
                    ContactRecord::office(
                        "Brooklyn CityFHEPS Office",
                        "718-557-1399",
                        "brooklyn.hra@nyc.gov",
                        "505 Clermont Ave, Brooklyn",
                    ),
                ),
                (
                    Bronx,
                    ContactRecord::office(
                        "Bronx CityFHEPS Office",
                        "718-503-4080",
                        "bronx.hra@nyc.gov",
                        "1916 Park Ave, Bronx",
                    ),
                ),
                (
                    Queens,
                    ContactRecord::office(
                        "Queens CityFHEPS Office",
                        "718-784-7216",
                        "queens.hra@nyc.gov",
                        "32-20 Northern Blvd, Queens",
                    ),
                ),
                (
                    StatenIsland,
                    ContactRecord::office(
                        "Staten Island CityFHEPS Office",
                        "718-390-8418",
                        "statenisland.hra@nyc.gov",
                        "201 Bay St, Staten Island",
                    ),
                ),
            ]),
        },
        section8: ProgramOffices {
            default: ContactRecord::office(
                "NYCHA Section 8 Central Office",
                "718-707-7771",
                "section8@nycha.nyc.gov",
                "478 E. 165th St., Bronx",
            ),
            boroughs: borough_offices([
                (
                    Manhattan,
                    ContactRecord::office(
                        "Manhattan NYCHA Section 8 Office",
                        "212-306-3000",
                        "manhattan.s8@nycha.nyc.gov",
                        "55 West 125th Street, Manhattan",
                    ),
                ),
                (
                    Brooklyn,
                    ContactRecord::office(
                        "Brooklyn NYCHA Section 8 Office",
                        "718-649-6400",
                        "brooklyn.s8@nycha.nyc.gov",
                        "787 Atlantic Ave, Brooklyn",
                    ),
                ),
                (
                    Bronx,
                    ContactRecord::office(
                        "Bronx NYCHA Section 8 Office",
                        "718-409-8626",
                        "bronx.s8@nycha.nyc.gov",
                        "478 E. 165th St., Bronx",
                    ),
                ),
                (
                    Queens,
                    ContactRecord::office(
                        "Queens NYCHA Section 8 Office",
                        "718-206-3286",
                        "queens.s8@nycha.nyc.gov",
                        "90-27 Sutphin Blvd, Queens",
                    ),
                ),
                (
                    StatenIsland,
                    ContactRecord::office(
                        "Staten Island NYCHA Section 8 Office",
                        "718-816-1521",
                        "statenisland.s8@nycha.nyc.gov",
                        "120 Stuyvesant Pl, Staten Island",
                    ),
                ),
            ]),
        },
        hasa: ProgramOffices {
            default: ContactRecord::office(
                "HIV/AIDS Services Administration",
                "212-971-0626",
                "hasa@hra.nyc.gov",
                "12 W 14th St, Manhattan",
            ),
            boroughs: BTreeMap::new(),
        },
        discrimination: DiscriminationOffices {
            default: ContactRecord::office(
                "NYC Commission on Human Rights",
                "212-416-0197",
                "complaints@cchr.nyc.gov",
                "22 Reade St, New York, NY 10007",
            ),
            legal: ContactRecord::office(
                "Housing Works Legal Team",
                "347-473-7400",
                "legal@housingworks.org",
                "57 Willoughby St, Brooklyn",
            ),
            fair_housing: ContactRecord::office(
                "Fair Housing Justice Center",
                "212-400-8201",
                "fhjc@fairhousingjustice.org",
                "30-30 Northern Blvd, Long Island City",
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(
        program: Option<&str>,
        borough: Option<&str>,
        is_discrimination: bool,
        use_borough_office: bool,
    ) -> ContactRecord {
        let directory = ContactDirectory::builtin();
        directory.resolve(program, borough, is_discrimination, use_borough_office)
    }

    #[test]
    fn program_synonyms_collapse_to_canonical_keys() {
        let cases = [
            ("CityFHEPS", "CITYFHEPS"),
            ("city fheps", "CITYFHEPS"),
            ("FHEPS", "CITYFHEPS"),
            ("c-fheps", "CITYFHEPS"),
            ("Section 8", "SECTION 8"),
            ("section8", "SECTION 8"),
            ("Section-8", "SECTION 8"),
            ("SECTION EIGHT", "SECTION 8"),
            ("s8", "SECTION 8"),
            ("Sec. 8", "SECTION 8"),
            ("H.A.S.A.", "HASA"),
            ("HIV/AIDS Services Admin", "HASA"),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                normalize_program_name(raw).as_deref(),
                Some(expected),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn unknown_program_normalizes_to_compact_uppercase() {
        assert_eq!(
            normalize_program_name("Unknown").as_deref(),
            Some("UNKNOWN")
        );
        assert_eq!(normalize_program_name("   "), None);
        assert_eq!(normalize_program_name(""), None);
        assert_eq!(VoucherProgram::parse("Unknown"), None);
    }

    #[test]
    fn borough_parse_accepts_spacing_and_case_variants() {
        assert_eq!(Borough::parse("Brooklyn"), Some(Borough::Brooklyn));
        assert_eq!(Borough::parse("  QUEENS "), Some(Borough::Queens));
        assert_eq!(Borough::parse("Staten Island"), Some(Borough::StatenIsland));
        assert_eq!(Borough::parse("staten-island"), Some(Borough::StatenIsland));
        assert_eq!(Borough::parse("staten_island"), Some(Borough::StatenIsland));
        assert_eq!(Borough::parse("Jersey City"), None);
    }

    #[test]
    fn hasa_discrimination_goes_to_housing_works_for_every_borough() {
        let boroughs = Borough::ALL
            .iter()
            .map(|b| Some(b.display_name()))
            .chain([None, Some("Hoboken")]);
        for borough in boroughs {
            let contact = resolve(Some("HASA"), borough, true, true);
            assert_eq!(
                contact.name,
                "Housing Works Legal Team",
                "borough: {borough:?}"
            );
            assert_eq!(contact.phone, "347-473-7400");
        }
    }

    #[test]
    fn discrimination_with_borough_office_uses_program_office() {
        let contact = resolve(Some("Section 8"), Some("Queens"), true, true);
        assert_eq!(contact.name, "Queens NYCHA Section 8 Office");
        assert_eq!(contact.phone, "718-206-3286");

        let contact = resolve(Some("CityFHEPS"), Some("Staten Island"), true, true);
        assert_eq!(contact.name, "Staten Island CityFHEPS Office");
        assert_eq!(contact.email, "statenisland.hra@nyc.gov");
    }

    #[test]
    fn discrimination_without_borough_office_goes_to_commission() {
        let commission = "NYC Commission on Human Rights";
        assert_eq!(
            resolve(Some("Section 8"), Some("Manhattan"), true, false).name,
            commission
        );
        assert_eq!(
            resolve(Some("CityFHEPS"), None, true, true).name,
            commission
        );
        assert_eq!(
            resolve(Some("Unknown"), Some("Bronx"), true, true).name,
            commission
        );
        assert_eq!(resolve(None, None, true, true).name, commission);
    }

    #[test]
    fn regular_requests_prefer_borough_then_program_then_general() {
        assert_eq!(
            resolve(Some("Section 8"), Some("brooklyn"), false, false).name,
            "Brooklyn NYCHA Section 8 Office"
        );
        assert_eq!(
            resolve(Some("CityFHEPS"), Some("brooklyn"), false, false).name,
            "Brooklyn CityFHEPS Office"
        );
        assert_eq!(
            resolve(Some("CityFHEPS"), None, false, false).name,
            "CityFHEPS Central Office"
        );
        assert_eq!(
            resolve(Some("HASA"), Some("Bronx"), false, false).name,
            "HIV/AIDS Services Administration"
        );
        assert_eq!(
            resolve(None, None, false, false).name,
            "HRA General Support"
        );
        assert_eq!(
            resolve(Some(""), None, false, false).name,
            "HRA General Support"
        );
        assert_eq!(
            resolve(Some("Unknown"), Some("Queens"), false, false).name,
            "HRA General Support"
        );
    }

    #[test]
    fn program_offices_cover_every_program() {
        let directory = ContactDirectory::builtin();
        let section8 = directory.program_offices(VoucherProgram::Section8);
        assert_eq!(section8.default.name, "NYCHA Section 8 Central Office");
        assert_eq!(section8.boroughs.len(), Borough::ALL.len());
        let hasa = directory.program_offices(VoucherProgram::Hasa);
        assert!(hasa.boroughs.is_empty());
    }

    #[test]
    fn resolve_is_referentially_transparent() {
        let first = resolve(Some("sec8"), Some("Bronx"), true, true);
        let second = resolve(Some("sec8"), Some("Bronx"), true, true);
        assert_eq!(first, second);
    }

    #[test]
    fn builtin_directory_loads_back_from_its_own_json() {
        let raw = serde_json::to_string(ContactDirectory::builtin()).expect("serialize directory");
        let loaded = ContactDirectory::from_json(&raw).expect("builtin directory is valid");
        assert_eq!(&loaded, ContactDirectory::builtin());
        assert_eq!(loaded.fair_housing().name, "Fair Housing Justice Center");
    }

    #[test]
    fn from_json_rejects_unknown_borough_keys() {
        let mut value =
            serde_json::to_value(ContactDirectory::builtin()).expect("serialize directory");
        value["SECTION 8"]["boroughs"]["hoboken"] =
            serde_json::to_value(&ContactDirectory::builtin().default).expect("serialize record");

        let err = ContactDirectory::from_json(&value.to_string()).expect_err("must reject");
        assert!(matches!(err, HandoffError::InvalidConfiguration(_)));
    }

    #[test]
    fn from_json_requires_every_program() {
        let mut value =
            serde_json::to_value(ContactDirectory::builtin()).expect("serialize directory");
        value
            .as_object_mut()
            .expect("directory is an object")
            .remove("HASA");

        let err = ContactDirectory::from_json(&value.to_string()).expect_err("must reject");
        assert!(matches!(err, HandoffError::InvalidConfiguration(_)));
    }

    #[test]
    fn from_json_rejects_blank_fields() {
        let mut value =
            serde_json::to_value(ContactDirectory::builtin()).expect("serialize directory");
        value["discrimination"]["legal"]["phone"] = serde_json::json!("  ");

        let err = ContactDirectory::from_json(&value.to_string()).expect_err("must reject");
        assert_eq!(
            err,
            HandoffError::InvalidConfiguration(
                "discrimination.legal.phone must not be empty".to_string()
            )
        );
    }
}
