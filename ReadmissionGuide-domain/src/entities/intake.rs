//! Field constraints and defaults of the patient intake form.
//!
//! The collector only applies range and choice constraints; the ranges here
//! match the `validate` attributes on [`PatientRecord`](super::PatientRecord).

use serde::Serialize;

use super::patient::{
    A1cResult, AgeGroup, DiabetesMedication, Gender, GlucoseSerum, InsulinDosage,
    MedicationChange, PrimaryDiagnosis,
};

/// Form section a field is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    PatientInformation,
    MedicalDetails,
    Administrative,
    PreviousEncounters,
}

/// Input widget constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Inclusive integer slider
    Integer { min: u32, max: u32, default: u32 },

    /// Single choice from a fixed list
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
}

/// A single intake form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Field name in the request payload
    pub name: &'static str,

    /// Label shown next to the input
    pub label: &'static str,

    pub section: FormSection,

    #[serde(flatten)]
    pub kind: FieldKind,

    /// Whether the risk scorer reads this field
    pub scored: bool,
}

const fn integer(
    name: &'static str,
    label: &'static str,
    section: FormSection,
    (min, max, default): (u32, u32, u32),
    scored: bool,
) -> FormField {
    FormField {
        name,
        label,
        section,
        kind: FieldKind::Integer { min, max, default },
        scored,
    }
}

const fn choice(
    name: &'static str,
    label: &'static str,
    section: FormSection,
    options: &'static [&'static str],
    scored: bool,
) -> FormField {
    FormField {
        name,
        label,
        section,
        kind: FieldKind::Choice {
            options,
            default: options[0],
        },
        scored,
    }
}

/// Every intake field, in form order
pub const FORM_FIELDS: &[FormField] = &[
    choice("age", "Age Group", FormSection::PatientInformation, AgeGroup::OPTIONS, false),
    choice("gender", "Gender", FormSection::PatientInformation, Gender::OPTIONS, false),
    integer("time_in_hospital", "Days in Hospital", FormSection::PatientInformation, (1, 14, 7), true),
    integer("num_lab_procedures", "Number of Lab Procedures", FormSection::PatientInformation, (0, 100, 50), true),
    integer("num_medications", "Number of Medications", FormSection::PatientInformation, (1, 80, 40), false),
    integer("num_procedures", "Number of Procedures", FormSection::PatientInformation, (0, 6, 2), false),
    integer("number_diagnoses", "Number of Diagnoses", FormSection::PatientInformation, (1, 16, 8), false),
    choice("max_glu_serum", "Max Glucose Serum", FormSection::MedicalDetails, GlucoseSerum::OPTIONS, true),
    choice("a1c_result", "A1C Result", FormSection::MedicalDetails, A1cResult::OPTIONS, true),
    choice("insulin", "Insulin", FormSection::MedicalDetails, InsulinDosage::OPTIONS, true),
    choice("diabetes_med", "Diabetes Medication", FormSection::MedicalDetails, DiabetesMedication::OPTIONS, false),
    choice("change", "Change in Medication", FormSection::MedicalDetails, MedicationChange::OPTIONS, false),
    integer("admission_type_id", "Admission Type ID", FormSection::Administrative, (1, 8, 1), false),
    integer("discharge_disposition_id", "Discharge Disposition ID", FormSection::Administrative, (1, 29, 1), false),
    integer("admission_source_id", "Admission Source ID", FormSection::Administrative, (1, 25, 7), false),
    integer("number_outpatient", "Number of Outpatient Visits", FormSection::PreviousEncounters, (0, 42, 0), false),
    integer("number_emergency", "Number of Emergency Visits", FormSection::PreviousEncounters, (0, 76, 0), true),
    integer("number_inpatient", "Number of Inpatient Visits", FormSection::PreviousEncounters, (0, 21, 0), true),
    choice("diag_1", "Primary Diagnosis", FormSection::PreviousEncounters, PrimaryDiagnosis::OPTIONS, false),
];

/// Look up a field by its payload name
pub fn find_field(name: &str) -> Option<&'static FormField> {
    FORM_FIELDS.iter().find(|field| field.name == name)
}

/// Position of a field in form order, used to report the first offending field
pub fn field_position(name: &str) -> usize {
    FORM_FIELDS
        .iter()
        .position(|field| field.name == name)
        .unwrap_or(FORM_FIELDS.len())
}
