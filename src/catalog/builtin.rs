//! Built-in catalog: the nursery-teacher job-change consultation.

use super::model::{ChoiceOption, QuestionDefinition, QuestionKind};
use super::Catalog;
use crate::error::CatalogError;

fn options(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption::new(*value, *label))
        .collect()
}

/// The question list used when no catalog file is configured.
pub fn builtin_questions() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::new(
            "timing",
            "転職をお考えの時期を教えていただけますか？",
            QuestionKind::SingleSelect {
                options: options(&[
                    ("immediately", "今すぐ"),
                    ("1month", "1ヶ月以内"),
                    ("3months", "3ヶ月以内"),
                    ("6months", "半年以内"),
                    ("considering", "検討中"),
                ]),
            },
        ),
        QuestionDefinition::new(
            "current_job",
            "現在のご職業を教えていただけますか？",
            QuestionKind::SingleSelect {
                options: options(&[
                    ("nursery", "保育士（正社員）"),
                    ("nursery_part", "保育士（非常勤）"),
                    ("other", "他職種"),
                    ("student", "学生"),
                    ("unemployed", "無職"),
                ]),
            },
        ),
        QuestionDefinition::new(
            "reason",
            "転職をお考えの理由を教えていただけますか？",
            QuestionKind::HybridSelectOrText {
                options: options(&[
                    ("salary", "給与面"),
                    ("location", "通勤の便"),
                    ("environment", "職場環境"),
                    ("career", "キャリアアップ"),
                    ("other", "その他"),
                ]),
            },
        )
        .with_help("選択肢から選ぶか、具体的な理由を記入してください"),
        QuestionDefinition::new(
            "commute",
            "通勤時間はどのくらいまでお考えですか？",
            QuestionKind::SingleSelect {
                options: options(&[
                    ("30min", "30分以内"),
                    ("45min", "45分以内"),
                    ("60min", "1時間以内"),
                    ("90min", "1時間30分以内"),
                    ("over90min", "1時間30分以上でも可"),
                ]),
            },
        ),
        QuestionDefinition::new(
            "address",
            "お住まいの地域を教えていただけますか？",
            QuestionKind::StructuredAddress,
        )
        .with_help("以下の項目をご入力ください"),
        QuestionDefinition::new(
            "current_salary",
            "現在の年収を教えていただけますか？",
            QuestionKind::PlainText,
        )
        .with_help("例：350万円"),
        QuestionDefinition::new(
            "desired_salary",
            "ご希望の年収を教えていただけますか？",
            QuestionKind::PlainText,
        )
        .with_help("例：400万円"),
        QuestionDefinition::new(
            "education",
            "最終学歴を教えていただけますか？",
            QuestionKind::PlainText,
        ),
        QuestionDefinition::new(
            "preference",
            "運営主体の希望をお聞かせください",
            QuestionKind::Percentage {
                primary: "株式会社".to_string(),
                secondary: "社会福祉法人".to_string(),
            },
        )
        .with_help("株式会社運営と社会福祉法人運営の志望度を％で教えてください"),
        QuestionDefinition::new(
            "priority",
            "待遇について、重視する項目を教えてください",
            QuestionKind::SingleSelect {
                options: options(&[("salary", "給与"), ("benefits", "福利厚生")]),
            },
        ),
        QuestionDefinition::new(
            "important_points",
            "その他、こだわりたいポイントがございましたら教えてください",
            QuestionKind::PlainText,
        )
        .with_help("自由にご記入ください"),
    ]
}

/// The built-in catalog, validated.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    Catalog::new(builtin_questions())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::new(builtin_questions()).unwrap();
        assert_eq!(catalog.len(), 11);
    }

    #[test]
    fn builtin_order_starts_with_timing() {
        let catalog = builtin_catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"timing"));
        assert_eq!(ids.last(), Some(&"important_points"));
        assert_eq!(catalog.find("address").unwrap().kind, QuestionKind::StructuredAddress);
    }
}
