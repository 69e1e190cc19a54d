use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A categorical value that is not one of the accepted choices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not one of {expected:?}")]
pub struct UnknownChoice {
    /// The rejected input
    pub value: String,

    /// Accepted values, in form order
    pub expected: &'static [&'static str],
}

/// Declares a closed set of form choices with their wire labels.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "with-api", derive(ToSchema))]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every accepted label, in form order
            pub const OPTIONS: &'static [&'static str] = &[$($label),+];

            /// The label used on the wire and in the form
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    other => Err(UnknownChoice {
                        value: other.to_string(),
                        expected: Self::OPTIONS,
                    }),
                }
            }
        }
    };
}

choice_enum! {
    /// Ten-year age bracket
    AgeGroup {
        Age0To10 => "[0-10)",
        Age10To20 => "[10-20)",
        Age20To30 => "[20-30)",
        Age30To40 => "[30-40)",
        Age40To50 => "[40-50)",
        Age50To60 => "[50-60)",
        Age60To70 => "[60-70)",
        Age70To80 => "[70-80)",
        Age80To90 => "[80-90)",
        Age90To100 => "[90-100)",
    }
}

choice_enum! {
    Gender {
        Male => "Male",
        Female => "Female",
    }
}

choice_enum! {
    /// Maximum glucose serum test result
    GlucoseSerum {
        /// Test not taken
        NotMeasured => "None",
        Norm => "Norm",
        Over200 => ">200",
        Over300 => ">300",
    }
}

choice_enum! {
    /// HbA1c test result
    A1cResult {
        /// Test not taken
        NotMeasured => "None",
        Norm => "Norm",
        Over7 => ">7",
        Over8 => ">8",
    }
}

choice_enum! {
    /// Insulin prescription and its direction of change
    InsulinDosage {
        No => "No",
        Down => "Down",
        Steady => "Steady",
        Up => "Up",
    }
}

choice_enum! {
    DiabetesMedication {
        No => "No",
        Yes => "Yes",
    }
}

choice_enum! {
    MedicationChange {
        No => "No",
        Changed => "Ch",
    }
}

choice_enum! {
    /// Primary diagnosis as a three-digit ICD-9 group
    PrimaryDiagnosis {
        Diabetes => "250",
        Hypertension => "401",
        Dysrhythmia => "427",
        IschemicHeartDisease => "414",
        HeartFailure => "428",
        UrinaryTractDisorder => "599",
        AcuteKidneyFailure => "584",
        LungDisease => "518",
        Asthma => "493",
        PancreaticDisease => "577",
    }
}

impl GlucoseSerum {
    /// Whether the reading is above 200 mg/dL
    pub fn is_elevated(&self) -> bool {
        matches!(self, GlucoseSerum::Over200 | GlucoseSerum::Over300)
    }
}

impl A1cResult {
    /// Whether the result is above 7%
    pub fn is_elevated(&self) -> bool {
        matches!(self, A1cResult::Over7 | A1cResult::Over8)
    }
}

/// Patient attributes collected by the intake form.
///
/// Only `time_in_hospital`, `num_lab_procedures`, `number_emergency`,
/// `number_inpatient`, `max_glu_serum`, `a1c_result` and `insulin` are read
/// by the scorer. The remaining fields are collected for interface stability
/// and have no effect on the assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientRecord {
    /// Age bracket (not scored)
    pub age: AgeGroup,

    /// Gender (not scored)
    pub gender: Gender,

    /// Days in hospital
    #[validate(range(min = 1, max = 14, message = "Days in hospital must be between 1 and 14"))]
    pub time_in_hospital: u32,

    /// Number of lab procedures during the encounter
    #[validate(range(max = 100, message = "Number of lab procedures must be between 0 and 100"))]
    pub num_lab_procedures: u32,

    /// Number of medications (not scored)
    #[validate(range(min = 1, max = 80, message = "Number of medications must be between 1 and 80"))]
    pub num_medications: u32,

    /// Number of non-lab procedures (not scored)
    #[validate(range(max = 6, message = "Number of procedures must be between 0 and 6"))]
    pub num_procedures: u32,

    /// Number of diagnoses entered (not scored)
    #[validate(range(min = 1, max = 16, message = "Number of diagnoses must be between 1 and 16"))]
    pub number_diagnoses: u32,

    /// Maximum glucose serum result
    pub max_glu_serum: GlucoseSerum,

    /// HbA1c result
    pub a1c_result: A1cResult,

    /// Insulin prescription
    pub insulin: InsulinDosage,

    /// Whether any diabetes medication was prescribed (not scored)
    pub diabetes_med: DiabetesMedication,

    /// Whether diabetic medication changed during the stay (not scored)
    pub change: MedicationChange,

    /// Admission type identifier (not scored)
    #[validate(range(min = 1, max = 8, message = "Admission type ID must be between 1 and 8"))]
    pub admission_type_id: u32,

    /// Discharge disposition identifier (not scored)
    #[validate(range(min = 1, max = 29, message = "Discharge disposition ID must be between 1 and 29"))]
    pub discharge_disposition_id: u32,

    /// Admission source identifier (not scored)
    #[validate(range(min = 1, max = 25, message = "Admission source ID must be between 1 and 25"))]
    pub admission_source_id: u32,

    /// Outpatient visits in the preceding year (not scored)
    #[validate(range(max = 42, message = "Number of outpatient visits must be between 0 and 42"))]
    pub number_outpatient: u32,

    /// Emergency visits in the preceding year
    #[validate(range(max = 76, message = "Number of emergency visits must be between 0 and 76"))]
    pub number_emergency: u32,

    /// Inpatient visits in the preceding year
    #[validate(range(max = 21, message = "Number of inpatient visits must be between 0 and 21"))]
    pub number_inpatient: u32,

    /// Primary diagnosis (not scored)
    pub diag_1: PrimaryDiagnosis,
}

impl Default for PatientRecord {
    /// The values the intake form starts with
    fn default() -> Self {
        Self {
            age: AgeGroup::Age0To10,
            gender: Gender::Male,
            time_in_hospital: 7,
            num_lab_procedures: 50,
            num_medications: 40,
            num_procedures: 2,
            number_diagnoses: 8,
            max_glu_serum: GlucoseSerum::NotMeasured,
            a1c_result: A1cResult::NotMeasured,
            insulin: InsulinDosage::No,
            diabetes_med: DiabetesMedication::No,
            change: MedicationChange::No,
            admission_type_id: 1,
            discharge_disposition_id: 1,
            admission_source_id: 7,
            number_outpatient: 0,
            number_emergency: 0,
            number_inpatient: 0,
            diag_1: PrimaryDiagnosis::Diabetes,
        }
    }
}
