// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loaded reference catalog and the compiled-in default.
//!
//! Risk brackets follow the growth stages: baby (≤6), young (≤24),
//! adult (≤84), senior (open-ended).

use async_trait::async_trait;
use petsim_core::{
    AgeRisk, CatalogKind, DiseaseRef, PetsimError, ReferenceCatalog, Severity, Species, VaccineRef,
};
use tracing::debug;

/// Diseases and vaccines held in memory for the lifetime of a runner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub diseases: Vec<DiseaseRef>,
    pub vaccines: Vec<VaccineRef>,
}

impl Catalog {
    /// Fetch both halves from `source`.
    ///
    /// Any failure is reported as [`PetsimError::CatalogUnavailable`] naming the
    /// half that could not be read. A half with no entries (an unseeded
    /// database) is reported the same way, so callers retry rather than cache it.
    pub async fn load(source: &dyn ReferenceCatalog) -> Result<Self, PetsimError> {
        let diseases = source.diseases().await.map_err(|e| unavailable(CatalogKind::Disease, e))?;
        let vaccines = source.vaccines().await.map_err(|e| unavailable(CatalogKind::Vaccine, e))?;
        if diseases.is_empty() {
            return Err(no_entries(CatalogKind::Disease));
        }
        if vaccines.is_empty() {
            return Err(no_entries(CatalogKind::Vaccine));
        }
        debug!(
            diseases = diseases.len(),
            vaccines = vaccines.len(),
            "reference catalog loaded"
        );
        Ok(Self { diseases, vaccines })
    }

    pub fn disease(&self, id: &str) -> Option<&DiseaseRef> {
        self.diseases.iter().find(|d| d.id == id)
    }

    pub fn vaccine(&self, id: &str) -> Option<&VaccineRef> {
        self.vaccines.iter().find(|v| v.id == id)
    }

    pub fn diseases_for(&self, species: Species) -> impl Iterator<Item = &DiseaseRef> {
        self.diseases.iter().filter(move |d| d.affects(species))
    }

    pub fn vaccines_for(&self, species: Species) -> impl Iterator<Item = &VaccineRef> {
        self.vaccines.iter().filter(move |v| v.applies_to(species))
    }

    /// The compiled-in catalog covering every supported species.
    pub fn builtin() -> Self {
        Self {
            diseases: builtin_diseases(),
            vaccines: builtin_vaccines(),
        }
    }
}

fn unavailable(kind: CatalogKind, err: PetsimError) -> PetsimError {
    match err {
        already @ PetsimError::CatalogUnavailable { .. } => already,
        other => PetsimError::CatalogUnavailable {
            kind: kind.to_string(),
            source: Box::new(other),
        },
    }
}

fn no_entries(kind: CatalogKind) -> PetsimError {
    PetsimError::CatalogUnavailable {
        kind: kind.to_string(),
        source: format!("no {kind} entries; run `petsim seed-catalog`").into(),
    }
}

/// [`ReferenceCatalog`] backed by [`Catalog::builtin`].
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    catalog: Catalog,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::builtin(),
        }
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferenceCatalog for BuiltinCatalog {
    async fn diseases(&self) -> Result<Vec<DiseaseRef>, PetsimError> {
        Ok(self.catalog.diseases.clone())
    }

    async fn vaccines(&self) -> Result<Vec<VaccineRef>, PetsimError> {
        Ok(self.catalog.vaccines.clone())
    }
}

fn brackets(baby: f64, young: f64, adult: f64, senior: f64) -> Vec<AgeRisk> {
    vec![
        AgeRisk { max_age_months: Some(6), risk: baby },
        AgeRisk { max_age_months: Some(24), risk: young },
        AgeRisk { max_age_months: Some(84), risk: adult },
        AgeRisk { max_age_months: None, risk: senior },
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

struct DiseaseRow<'a> {
    id: &'a str,
    name: &'a str,
    severity: Severity,
    health_impact: u8,
    happiness_impact: u8,
    days: (u32, u32),
    treatment_cost: f64,
    species: &'a [Species],
    symptoms: &'a [&'a str],
    prevention_tips: &'a [&'a str],
    risk_by_age: Vec<AgeRisk>,
}

impl DiseaseRow<'_> {
    fn build(self) -> DiseaseRef {
        DiseaseRef {
            id: self.id.to_string(),
            name: self.name.to_string(),
            severity: self.severity,
            health_impact: self.health_impact,
            happiness_impact: self.happiness_impact,
            min_duration_days: self.days.0,
            max_duration_days: self.days.1,
            treatment_cost: self.treatment_cost,
            species: self.species.to_vec(),
            symptoms: strings(self.symptoms),
            prevention_tips: strings(self.prevention_tips),
            risk_by_age: self.risk_by_age,
        }
    }
}

fn builtin_diseases() -> Vec<DiseaseRef> {
    use Severity::{Mild, Moderate, Severe};
    use Species::{Bird, Cat, Dog, Hamster, Rabbit};

    vec![
        DiseaseRow {
            id: "canine-parvovirus",
            name: "Canine Parvovirus",
            severity: Severe,
            health_impact: 8,
            happiness_impact: 6,
            days: (5, 10),
            treatment_cost: 450.0,
            species: &[Dog],
            symptoms: &["vomiting", "bloody diarrhea", "lethargy"],
            prevention_tips: &["Complete the DHPP series", "Avoid unvaccinated dogs"],
            risk_by_age: brackets(0.45, 0.20, 0.05, 0.10),
        }
        .build(),
        DiseaseRow {
            id: "kennel-cough",
            name: "Kennel Cough",
            severity: Mild,
            health_impact: 2,
            happiness_impact: 2,
            days: (7, 21),
            treatment_cost: 60.0,
            species: &[Dog],
            symptoms: &["dry cough", "sneezing"],
            prevention_tips: &["Bordetella vaccine before boarding", "Good ventilation"],
            risk_by_age: brackets(0.25, 0.15, 0.10, 0.20),
        }
        .build(),
        DiseaseRow {
            id: "lyme-disease",
            name: "Lyme Disease",
            severity: Moderate,
            health_impact: 4,
            happiness_impact: 3,
            days: (14, 28),
            treatment_cost: 180.0,
            species: &[Dog],
            symptoms: &["lameness", "fever", "swollen joints"],
            prevention_tips: &["Tick checks after walks", "Tick prevention treatment"],
            risk_by_age: brackets(0.05, 0.12, 0.15, 0.15),
        }
        .build(),
        DiseaseRow {
            id: "rabies",
            name: "Rabies",
            severity: Severe,
            health_impact: 12,
            happiness_impact: 8,
            days: (7, 14),
            treatment_cost: 1000.0,
            species: &[Dog, Cat],
            symptoms: &["aggression", "excessive drooling", "paralysis"],
            prevention_tips: &["Keep rabies vaccination current", "Avoid wildlife contact"],
            risk_by_age: brackets(0.08, 0.06, 0.04, 0.05),
        }
        .build(),
        DiseaseRow {
            id: "feline-panleukopenia",
            name: "Feline Panleukopenia",
            severity: Severe,
            health_impact: 8,
            happiness_impact: 6,
            days: (5, 12),
            treatment_cost: 400.0,
            species: &[Cat],
            symptoms: &["fever", "vomiting", "loss of appetite"],
            prevention_tips: &["Complete the FVRCP series", "Disinfect shared bowls"],
            risk_by_age: brackets(0.40, 0.18, 0.05, 0.10),
        }
        .build(),
        DiseaseRow {
            id: "feline-upper-respiratory",
            name: "Feline Upper Respiratory Infection",
            severity: Moderate,
            health_impact: 3,
            happiness_impact: 3,
            days: (7, 14),
            treatment_cost: 90.0,
            species: &[Cat],
            symptoms: &["sneezing", "runny eyes", "congestion"],
            prevention_tips: &["Limit stress", "Isolate new cats for two weeks"],
            risk_by_age: brackets(0.35, 0.20, 0.10, 0.25),
        }
        .build(),
        DiseaseRow {
            id: "feline-leukemia",
            name: "Feline Leukemia",
            severity: Severe,
            health_impact: 6,
            happiness_impact: 5,
            days: (30, 90),
            treatment_cost: 600.0,
            species: &[Cat],
            symptoms: &["weight loss", "pale gums", "recurring infections"],
            prevention_tips: &["FeLV vaccine for outdoor cats", "Test new cats before introduction"],
            risk_by_age: brackets(0.20, 0.15, 0.08, 0.10),
        }
        .build(),
        DiseaseRow {
            id: "psittacosis",
            name: "Psittacosis",
            severity: Moderate,
            health_impact: 4,
            happiness_impact: 4,
            days: (21, 45),
            treatment_cost: 150.0,
            species: &[Bird],
            symptoms: &["fluffed feathers", "nasal discharge", "green droppings"],
            prevention_tips: &["Clean the cage weekly", "Quarantine new birds"],
            risk_by_age: brackets(0.20, 0.12, 0.08, 0.15),
        }
        .build(),
        DiseaseRow {
            id: "avian-polyomavirus",
            name: "Avian Polyomavirus",
            severity: Severe,
            health_impact: 9,
            happiness_impact: 6,
            days: (3, 10),
            treatment_cost: 250.0,
            species: &[Bird],
            symptoms: &["abdominal swelling", "feather abnormalities", "weakness"],
            prevention_tips: &["Polyomavirus vaccine for chicks", "Avoid bird fairs"],
            risk_by_age: brackets(0.40, 0.10, 0.03, 0.03),
        }
        .build(),
        DiseaseRow {
            id: "myxomatosis",
            name: "Myxomatosis",
            severity: Severe,
            health_impact: 10,
            happiness_impact: 7,
            days: (10, 14),
            treatment_cost: 300.0,
            species: &[Rabbit],
            symptoms: &["swollen eyelids", "fever", "skin lumps"],
            prevention_tips: &["Annual myxomatosis vaccine", "Insect screens on hutches"],
            risk_by_age: brackets(0.30, 0.20, 0.15, 0.20),
        }
        .build(),
        DiseaseRow {
            id: "rabbit-hemorrhagic-disease",
            name: "Rabbit Hemorrhagic Disease",
            severity: Severe,
            health_impact: 12,
            happiness_impact: 8,
            days: (2, 5),
            treatment_cost: 350.0,
            species: &[Rabbit],
            symptoms: &["lethargy", "fever", "sudden collapse"],
            prevention_tips: &["RHDV2 vaccine", "Wash hands after handling other rabbits"],
            risk_by_age: brackets(0.15, 0.20, 0.15, 0.15),
        }
        .build(),
        DiseaseRow {
            id: "snuffles",
            name: "Snuffles",
            severity: Mild,
            health_impact: 2,
            happiness_impact: 2,
            days: (7, 21),
            treatment_cost: 70.0,
            species: &[Rabbit],
            symptoms: &["sneezing", "nasal discharge"],
            prevention_tips: &["Dust-free bedding", "Keep the hutch dry"],
            risk_by_age: brackets(0.15, 0.12, 0.10, 0.20),
        }
        .build(),
        DiseaseRow {
            id: "wet-tail",
            name: "Wet Tail",
            severity: Severe,
            health_impact: 10,
            happiness_impact: 6,
            days: (2, 7),
            treatment_cost: 80.0,
            species: &[Hamster],
            symptoms: &["watery diarrhea", "hunched posture", "lethargy"],
            prevention_tips: &["Minimise stress after adoption", "Clean the cage often"],
            risk_by_age: brackets(0.40, 0.15, 0.05, 0.10),
        }
        .build(),
        DiseaseRow {
            id: "hamster-respiratory-infection",
            name: "Respiratory Infection",
            severity: Mild,
            health_impact: 3,
            happiness_impact: 2,
            days: (5, 14),
            treatment_cost: 50.0,
            species: &[Hamster],
            symptoms: &["wheezing", "sneezing"],
            prevention_tips: &["Avoid drafts", "Unscented bedding"],
            risk_by_age: brackets(0.10, 0.10, 0.10, 0.25),
        }
        .build(),
    ]
}

#[allow(clippy::too_many_arguments)]
fn vaccine(
    id: &str,
    name: &str,
    target_disease: &str,
    species: &[Species],
    min_age_months: u32,
    first_dose_deadline_months: Option<u32>,
    booster_interval_months: Option<u32>,
    residual_risk: f64,
    cost: f64,
    side_effects: &[&str],
) -> VaccineRef {
    VaccineRef {
        id: id.to_string(),
        name: name.to_string(),
        target_disease: target_disease.to_string(),
        protection_months: booster_interval_months.unwrap_or(36),
        cost,
        species: species.to_vec(),
        min_age_months,
        max_age_months: None,
        first_dose_deadline_months,
        booster_interval_months,
        residual_risk,
        side_effects: strings(side_effects),
    }
}

fn builtin_vaccines() -> Vec<VaccineRef> {
    use Species::{Bird, Cat, Dog, Rabbit};

    vec![
        vaccine(
            "dhpp",
            "DHPP",
            "canine-parvovirus",
            &[Dog],
            2,
            Some(12),
            Some(12),
            0.05,
            45.0,
            &["mild fever", "soreness at injection site"],
        ),
        vaccine(
            "rabies",
            "Rabies",
            "rabies",
            &[Dog, Cat],
            3,
            Some(6),
            Some(12),
            0.03,
            30.0,
            &["lethargy"],
        ),
        vaccine(
            "bordetella",
            "Bordetella",
            "kennel-cough",
            &[Dog],
            2,
            None,
            Some(12),
            0.2,
            25.0,
            &["sneezing"],
        ),
        vaccine(
            "fvrcp",
            "FVRCP",
            "feline-panleukopenia",
            &[Cat],
            2,
            Some(12),
            Some(12),
            0.05,
            40.0,
            &["mild fever"],
        ),
        vaccine(
            "felv",
            "FeLV",
            "feline-leukemia",
            &[Cat],
            2,
            None,
            Some(12),
            0.15,
            35.0,
            &["swelling at injection site"],
        ),
        vaccine(
            "avian-polyomavirus",
            "Avian Polyomavirus",
            "avian-polyomavirus",
            &[Bird],
            1,
            Some(4),
            Some(12),
            0.1,
            40.0,
            &["temporary lethargy"],
        ),
        vaccine(
            "myxomatosis",
            "Myxomatosis",
            "myxomatosis",
            &[Rabbit],
            2,
            Some(6),
            Some(12),
            0.05,
            40.0,
            &["small lump at injection site"],
        ),
        vaccine(
            "rhdv2",
            "RHDV2",
            "rabbit-hemorrhagic-disease",
            &[Rabbit],
            2,
            Some(6),
            Some(12),
            0.05,
            45.0,
            &["mild fever"],
        ),
    ]
}
