use crate::domain::{ExamRequest, OptimizeRequest, PracticeRequest};

pub const EXAM_SYSTEM_PROMPT: &str =
    "You are an assistant that turns exam material into structured JSON. Reply with JSON only.";

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn formatting_prompt(raw_text: &str, max_chars: usize) -> String {
    format!(
        r#"You are an expert exam formatter. The text below was extracted from an uploaded exam document.

1. Identify the exam structure: title, subject and grade.
2. Extract every question in its original order.
3. Classify question types carefully:
   - 'calculation' is only for bare arithmetic or equations such as "1+1=" or "2x+3=7".
   - 'essay' covers application and word problems, even when they involve calculation.
   - 'multiple_choice', 'fill_in_blank', 'judgment' and 'short_answer' as usual.
4. Fix formatting:
   - Give fill-in-the-blank parentheses enough room, e.g. "(       )".
   - Keep multiple choice options as separate entries.
   - When one number holds several short calculations, split them into separate questions or separate them with newlines.
5. Answer with JSON that matches the response schema.

Raw text:
"""
{}
"""
"#,
        truncate_chars(raw_text, max_chars)
    )
}

pub fn text_parsing_prompt(text: &str) -> String {
    format!(
        r#"你是一位专业的试卷分析助手。请仔细分析以下试题文本，并将其整理为结构化的试卷格式。

# 试题文本
{}

# 解析要求

1. 试卷基本信息：提取标题、科目和年级；没有标题时根据内容拟定；按题量估算考试时间并计算总分。
2. 题型识别：
   - 选择题 (multiple_choice)：带 A、B、C、D 等选项
   - 判断题 (judgment)：判断对错，通常带括号（ ）
   - 填空题 (fill_in_blank)：带下划线 ___ 或括号（ ）
   - 简答题 (short_answer)
   - 计算题 (calculation)
   - 解答题/应用题 (essay)
3. 题目结构：保留原题号顺序；题目文本不含题号；提取选项；原文无分值时按题型分配分值；
   选择题、判断题、填空题的 answerSpaceLines 为 0，计算题/简答题 3-5 行，解答题/应用题 5-8 行。
4. 分组：按原文大题分组，每个大题一个 section，section 的 title 只写题型名称，不带编号。
5. 原文若附参考答案，忽略答案，只提取题目。

请严格按照提供的 JSON Schema 输出。
"#,
        text
    )
}

pub fn exam_generation_prompt(request: &ExamRequest) -> String {
    format!(
        r#"你是一位专业的中国{level}老师。请根据以下要求生成一份完整的试卷：

1. 年级：{grade}
2. 科目：{subject}
3. 考察的知识点：{topic}
4. 难度：{difficulty}

试卷结构要求：
- 题量充足（选择题/判断题 10 道以上，填空题 5 道以上，大题 3-5 道）。
- 包含选择题、判断题、填空题、简答题、计算题、应用题。

图示规则：
- 选择题、填空题、判断题必须是纯文本。
- 只有应用题、计算题、简答题确实需要几何图形或电路图时，才填写 textDiagram（ASCII 图）。
- 不要生成 imagePrompt。

内容必须是中文，格式正式。
"#,
        level = request.level,
        grade = request.grade_spec,
        subject = request.subject,
        topic = request.topic_description,
        difficulty = request.difficulty.label(),
    )
}

pub fn practice_generation_prompt(request: &PracticeRequest) -> String {
    let (type_instruction, image_instruction) = if request.is_geometry() {
        (
            "生成几何/图形题，归类为 calculation 或 short_answer，题目必须包含图形描述。".to_string(),
            "每道题都必须填写 imagePrompt，描述所需的几何图形（如三角形、圆、角）。",
        )
    } else {
        let mut type_instruction = format!("生成 {} 类型的题目。", request.question_type);
        if request.question_type == "calculation" {
            type_instruction.push_str(
                " 必须是纯计算题（例如 '1+1=?'、解方程、求导），禁止生成应用题、文字题或情景题。",
            );
        }
        let image_instruction = if request.allows_illustrations() {
            "如有必要（如物理场景、几何）可以填写 imagePrompt，否则留空。"
        } else {
            "不要填写 imagePrompt。"
        };
        (type_instruction, image_instruction)
    };

    format!(
        r#"你是一位专业的中国{level}老师。请根据以下要求生成一份专项练习：

1. 年级：{grade}
2. 科目：{subject}
3. 专项类型：{question_type}
4. 知识点：{topic}
5. 题目数量：约 {count} 题

要求：
- 试卷只包含一个大题（section）。
- {type_instruction}
- {image_instruction}
- 题目内容必须是中文，格式正式。
- 计算题数字要合理，应用题情境贴近生活。
"#,
        level = request.level,
        grade = request.grade_spec,
        subject = request.subject,
        question_type = request.question_type,
        topic = request.topic_description,
        count = request.count,
    )
}

pub fn topic_rewrite_prompt(request: &OptimizeRequest) -> String {
    format!(
        r#"User input: "{}"
Context: Grade {}, Subject {}.

The user is a teacher describing the topics an exam should cover. Rewrite the input to be professional, detailed and clear, expanding on concepts implied for this grade level.
Keep it under 80 words.
Output only the rewritten text, in Chinese.
"#,
        request.raw_input, request.grade, request.subject
    )
}

pub fn illustration_prompt(subject: &str) -> String {
    format!(
        "Create a simple black and white line drawing for a school test. White background, clear lines, no text labels. Subject: {}",
        subject
    )
}

