//! Copy shown under each rendered section

use crate::field::FieldKey;

/// Body written for a field with no content
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Question rendered as the `###` sub-heading of a field
#[must_use]
pub const fn prompt_for(field: FieldKey) -> &'static str {
    match field {
        FieldKey::Keep => "본 스프린트에서 잘된 점 또는 계속 유지해야 할 부분은 무엇인가요?",
        FieldKey::Problem => "본 스프린트에서 문제점 또는 개선이 필요한 부분은 무엇인가요?",
        FieldKey::Try => "본 스프린트에서 시도해보고 싶은 새로운 아이디어나 방법은 무엇인가요?",
        FieldKey::CssContinue => {
            "프로젝트에 좋은 영향을 끼쳤거나 계속 유지하고 싶은 행동은 무엇이었나요?"
        }
        FieldKey::CssStop => "프로젝트에 부정적인 영향을 주거나 비효율적인 행동은 무엇이었나요?",
        FieldKey::CssStart => "개선에 필요한 행동을 작성해주세요!",
        FieldKey::Liked => "프로젝트를 진행하며 좋았던 부분과 그 이유는 무엇인가요?",
        FieldKey::Learned => "프로젝트를 진행하며 배운 점은 무엇인가요?",
        FieldKey::Lacked => "프로젝트 진행중 본인 또는 팀이 부족했던 점을 작성해주세요",
        FieldKey::LoggedFor => "프로젝트에서 희망하는 점을 작성해주세요",
    }
}

/// Document title for a sprint
///
/// Whitespace runs in the label, line breaks included, collapse to single
/// spaces so the title always stays one line.
#[must_use]
pub fn title_line(sprint_label: &str) -> String {
    let label = sprint_label.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("# {label} 회고록")
}
