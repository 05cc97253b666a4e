//! Built-in schema for the heat-illness surveillance table.
//!
//! 39 columns in the exact order of the published `heat_data.csv` layout.

use fieldnorm_model::{
    BooleanParams, DateParams, FieldKind, FieldSpec, MulticlassParams, NumericParams, TextParams,
    TimeParams,
};

use crate::error::Result;
use crate::registry::SchemaRegistry;

pub const HEAT_SCHEMA_NAME: &str = "heat-data";

const CONDITION_DESCRIPTION: &str = "condition flag (1/0/null)";

fn spec(name: &str, display: &str, kind: FieldKind, description: &str) -> FieldSpec {
    FieldSpec::new(name, kind)
        .with_display_name(display)
        .with_description(description)
}

fn text(name: &str, display: &str, max_length: usize, description: &str) -> FieldSpec {
    spec(
        name,
        display,
        FieldKind::Text(TextParams::default().with_max_length(max_length)),
        description,
    )
}

fn numeric(min: f64, max: f64) -> NumericParams {
    NumericParams::new().with_range(min, max)
}

fn condition(name: &str, display: &str) -> FieldSpec {
    spec(
        name,
        display,
        FieldKind::Boolean(BooleanParams::default()),
        &format!("{display} {CONDITION_DESCRIPTION}"),
    )
}

fn vocabulary(entries: &[&str]) -> MulticlassParams {
    MulticlassParams::with_vocabulary(entries.iter().copied())
}

/// Field declarations of the heat surveillance table, in column order.
pub fn heat_data_fields() -> Vec<FieldSpec> {
    vec![
        spec(
            "ที่",
            "ID",
            FieldKind::Float(numeric(1.0, 99_999.0).with_decimal_places(0)),
            "Running record number",
        ),
        spec(
            "จังหวัดที่เกิดเหตุ",
            "Province",
            FieldKind::Multiclass(MulticlassParams::default()),
            "Province where the incident occurred",
        ),
        text("อำเภอ", "District", 100, "District (amphoe)"),
        text("ตำบล", "Subdistrict", 100, "Subdistrict (tambon)"),
        spec(
            "ภาค",
            "Region",
            FieldKind::Multiclass(vocabulary(&[
                "ภาคเหนือ",
                "ภาคกลางและตะวันตก",
                "ภาคตะวันออกเฉียงเหนือ",
                "ภาคตะวันออก",
                "ภาคใต้",
            ])),
            "Geographical region",
        ),
        spec(
            "สคร.",
            "Health Region",
            FieldKind::Text(
                TextParams::default()
                    .with_max_length(50)
                    .with_pattern(r"^สคร\.\s*\d{1,2}$"),
            ),
            "Office of Disease Prevention and Control region",
        ),
        spec(
            "ปี",
            "Year",
            FieldKind::Integer(numeric(2020.0, 2030.0)),
            "Year of the incident",
        ),
        spec(
            "สถานะ",
            "Status",
            FieldKind::Multiclass(vocabulary(&["เสียชีวิต", "รอดชีวิต", "ไม่ระบุ"])),
            "Outcome for the patient",
        )
        .with_default_value("เสียชีวิต"),
        spec(
            "ว/ด/ป เสียชีวิต",
            "Date of Death",
            FieldKind::Date(DateParams::default()),
            "Date of death, written out as ISO 8601",
        ),
        spec(
            "เดือน ที่เสียชีวิต",
            "Month of Death",
            FieldKind::Multiclass(MulticlassParams::default()),
            "Thai month name of the date of death",
        ),
        spec(
            "เวลาที่เสียชีวิต",
            "Time of Death",
            FieldKind::Time(TimeParams::default()),
            "Time of death as HH:MM:SS",
        ),
        spec(
            "เพศ",
            "Gender",
            FieldKind::Multiclass(vocabulary(&["ชาย", "หญิง", "ไม่ระบุ"])),
            "Gender",
        ),
        spec(
            "อายุ(ปี)",
            "Age (Years)",
            FieldKind::Integer(numeric(0.0, 120.0).with_clamp(true)),
            "Age in years, clamped to 0-120",
        ),
        text("เชื้อชาติ", "Ethnicity", 50, "Ethnicity"),
        text("สัญชาติ", "Nationality", 50, "Nationality"),
        text("อาชีพ", "Occupation", 100, "Occupation"),
        text("ลักษณะงาน", "Work Type", 200, "Kind of work"),
        text("โรคประจำตัว", "Chronic Disease", 200, "Chronic diseases, summary"),
        text(
            "โรคประจำตัว(รายละเอียด)",
            "Chronic Disease Details",
            500,
            "Chronic diseases, details",
        ),
        condition("ความดันโลหิตสูง", "Hypertension"),
        condition("เบาหวาน", "Diabetes"),
        condition("หัวใจและหลอดเลือด", "Cardiovascular Disease"),
        condition("หอบหืด", "Asthma"),
        condition("โรคตับ", "Liver Disease"),
        text("โรคอื่นๆ", "Other Diseases", 200, "Other diseases or conditions"),
        text("พฤติกรรมเสี่ยง", "Risk Behavior", 300, "Risk behaviors"),
        text(
            "สถานที่ป่วย/หรือเสียชีวิต",
            "Location of Illness/Death",
            200,
            "Where the illness or death happened",
        ),
        text("ลักษณะพื้นที่", "Area Characteristics", 300, "Surroundings of the location"),
        spec(
            "อุณหภูมิ สวล.(C°)",
            "Environmental Temperature (°C)",
            FieldKind::Float(numeric(-10.0, 60.0)),
            "Ambient temperature in Celsius",
        ),
        text("ลักษณะอาการ", "Symptoms", 300, "Symptoms and clinical presentation"),
        text(
            "กิจกรรม/พฤติกรรมเสี่ยงก่อนเกิดเหตุ",
            "Pre-incident Activities",
            400,
            "Activities before the incident",
        ),
        spec(
            "อุณหภูมิร่างกาย(C°)",
            "Body Temperature (°C)",
            FieldKind::Float(numeric(30.0, 45.0)),
            "Body temperature in Celsius",
        ),
        spec(
            "ประวัติการสัมผัสความร้อนก่อนเสียชีวิต",
            "Heat Exposure History",
            FieldKind::Boolean(BooleanParams::default()),
            "Exposure to heat before death (1/0/null)",
        ),
        spec(
            "ICD 10",
            "ICD-10 Code",
            FieldKind::Text(
                TextParams::default()
                    .with_max_length(20)
                    .with_pattern(r"^[A-Z]\d{2}(\.\d{1,2})?$"),
            ),
            "ICD-10 diagnosis code",
        ),
        text("ผลการวินิจฉัย", "Diagnosis Result", 300, "Diagnosis or conclusion"),
        text("Unnamed: 35", "Unnamed Column 35", 200, "Unlabelled source column"),
        text("ข้อมูลอื่นๆ", "Other Information", 500, "Other relevant information"),
        text("หมายเหตุ", "Remarks", 500, "Remarks"),
        text("ที่มาสื่อออนไลน์", "Online Media Source", 300, "Online news source or URL"),
    ]
}

/// The heat surveillance schema as a registry.
pub fn heat_data_schema() -> Result<SchemaRegistry> {
    Ok(SchemaRegistry::new(HEAT_SCHEMA_NAME, heat_data_fields())?
        .with_description("Heat-illness surveillance records"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::LogicalType;

    #[test]
    fn thirty_nine_columns_in_order() {
        let schema = heat_data_schema().expect("built-in schema is valid");
        let order = schema.column_order();
        assert_eq!(order.len(), 39);
        assert_eq!(order[0], "ที่");
        assert_eq!(order[12], "อายุ(ปี)");
        assert_eq!(order[35], "Unnamed: 35");
        assert_eq!(order[38], "ที่มาสื่อออนไลน์");
    }

    #[test]
    fn type_counts() {
        let schema = heat_data_schema().expect("built-in schema is valid");
        assert_eq!(schema.fields_of_type(LogicalType::Boolean).len(), 6);
        assert_eq!(schema.fields_of_type(LogicalType::Multiclass).len(), 5);
        assert_eq!(schema.fields_of_type(LogicalType::Date), ["ว/ด/ป เสียชีวิต"]);
        assert_eq!(
            schema.get("สถานะ").and_then(|f| f.default_value.as_deref()),
            Some("เสียชีวิต")
        );
    }
}
