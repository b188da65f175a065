use crate::model::QaRecord;

const RUBRIC: &str = "\
ACCURACY (1-10):
- 9-10: Perfect, comprehensive, technically accurate
- 7-8: Very good, mostly accurate with minor gaps
- 5-6: Adequate, generally correct but incomplete
- 3-4: Poor, significant inaccuracies
- 1-2: Wrong, misleading, or blank

STYLE (1-10):
- 9-10: Excellent clarity, professional, well-structured
- 7-8: Good clarity, minor style issues
- 5-6: Adequate readability, some confusion
- 3-4: Poor clarity, hard to follow
- 1-2: Very poor, unprofessional, or blank";

const RESPONSE_SHAPE: &str = r#"```json
{
  "accuracy": {
    "score": 8,
    "explanation": "Detailed explanation of accuracy rating"
  },
  "style": {
    "score": 7,
    "explanation": "Detailed explanation of style rating"
  }
}
```"#;

pub(crate) fn build_prompt_impl(record: &QaRecord) -> String {
    format!(
        "FINAL QUALITY CHECK: Rate this instruction tuning record from 1-10 for accuracy and style.\n\n\
         Record:\n\
         Question: {}\n\
         Answer: {}\n\n\
         Evaluate based on these strict criteria:\n\n\
         {}\n\n\
         Return ONLY this JSON format:\n\n\
         {}\n\n\
         IMPORTANT: Return ONLY the JSON, no additional text.",
        record.question, record.answer, RUBRIC, RESPONSE_SHAPE
    )
}
