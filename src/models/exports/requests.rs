use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::finance::entities::PaymentStatus;
use serde::Deserialize;
use ts_rs::TS;

/// 导出文件格式，未知格式按 CSV 处理
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exports.ts")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ExportFormat::from_name(&s))
    }
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exports.ts")]
pub struct StudentExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exports.ts")]
pub struct GradeExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exports.ts")]
pub struct PaymentExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_falls_back_to_csv() {
        assert_eq!(ExportFormat::from_name("XLSX"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_name("pdf"), ExportFormat::Csv);
        let params = actix_web::web::Query::<StudentExportParams>::from_query("format=doc&class_id=2")
            .unwrap()
            .into_inner();
        assert_eq!(params.format, ExportFormat::Csv);
        assert_eq!(params.class_id, Some(2));
    }
}
