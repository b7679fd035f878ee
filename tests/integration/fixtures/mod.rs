// Test fixtures with known letter drafts and expected renderings
// WHY: Golden-style testing requires deterministic input/output pairs

/// Generated first draft of a recommendation letter
pub const ORIGINAL_DRAFT: &str = "To the admissions committee.

I am pleased to recommend Jane Kim. She was my student
for two years.

Jane is kind. She is curious!
Sincerely, Prof. Lee";

/// The same letter after one AI refinement
pub const REFINED_DRAFT: &str = "To the admissions committee.

I am delighted to recommend Jane Kim. She was my student for two years.

She is curious! Jane is exceptionally kind. She led our lab seminar.
Sincerely, Prof. Lee";

/// Expected rendering of REFINED_DRAFT against ORIGINAL_DRAFT
/// Format: index<TAB>changed-flag<TAB>sentence, blank lines kept as "-"
pub const REFINED_EXPECTED: &str = "0\t \tTo the admissions committee.
-
1\t*\tI am delighted to recommend Jane Kim.
2\t \tShe was my student for two years.
-
3\t \tShe is curious!
4\t*\tJane is exceptionally kind.
5\t*\tShe led our lab seminar.
6\t \tSincerely, Prof.
7\t \tLee";

/// Evaluator reply in the service's Korean line format
pub const KOREAN_EVALUATOR_REPLY: &str = "정확성: 4점 - 사실 관계가 대체로 정확함
전문성: 5점 - 문체가 안정적임
논리성/구조: 3점 - 문단 연결이 약함
개인화: 2점 - 구체적 사례 부족
설득력: 4점 - 추천 의사가 분명함";

/// Evaluation payload as returned by the evaluation endpoint
pub const EVALUATION_JSON: &str = r#"{
    "scores": {"정확성": 4, "전문성": 5, "논리성": 3, "개인화": 2, "설득력": 4},
    "improvements": [
        {"metric": "정확성", "score": 4, "reason": "mostly accurate", "improvement": "add data"},
        {"metric": "개인화", "score": 2, "reason": "generic", "improvement": "add examples"}
    ]
}"#;
