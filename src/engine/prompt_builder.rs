use crate::engine::hud_decoder::{
    LABEL_EQUIPMENT, LABEL_NOTES, LABEL_STATS, LABEL_STATUS, LABEL_TAGS,
};
use crate::engine::interceptor::{PERK_MARKER, RESET_MARKER};
use crate::model::game_state::GameState;
use crate::model::job::JobClass;

/// Builds the text sent to the model. Formatting only.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Standing rules for every session, including the HUD and control-token
    /// conventions the parser relies on.
    pub fn system_instruction() -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "당신은 폐허가 된 세계를 무대로 한 텍스트 생존 RPG의 게임 마스터입니다.\n\
             플레이어의 선택에 따라 긴장감 있는 서사를 한국어로 전개하세요.\n\
             플레이어 캐릭터의 행동과 대사를 대신 결정하지 마세요.\n\n",
        );

        push_hud_rules(&mut prompt);
        push_choice_rules(&mut prompt);
        push_control_rules(&mut prompt);

        prompt
    }

    pub fn opening_scene(job: &JobClass, perk: Option<&str>) -> String {
        let mut prompt = String::new();

        prompt.push_str("[게임 시작]\n");
        prompt.push_str(&format!("직업: {} ({})\n", job.name, job.description));

        match perk {
            Some(perk) => prompt.push_str(&format!(
                "계승 특성: {perk}\n이 특성은 이전 회차에서 얻은 것입니다. 첫 장면부터 자연스럽게 반영하세요.\n"
            )),
            None => prompt.push_str("계승 특성: 없음\n"),
        }

        prompt.push_str(
            "\n첫 장면을 묘사하고, 초기 상태를 HUD 블록으로 보여준 뒤 선택지를 제시하세요.",
        );
        prompt
    }

    /// Sent after a saved log has been replayed into a new session.
    pub fn resume_notice(state: &GameState, perk: Option<&str>) -> String {
        let mut prompt = String::new();

        prompt.push_str("[세션 복원]\n");
        prompt.push_str("저장된 기록에서 게임을 이어갑니다. 지금까지의 대화가 전체 맥락입니다.\n");

        if !state.is_empty() {
            prompt.push_str("마지막으로 확인된 상태:\n");
            push_state_lines(&mut prompt, state);
        }
        if let Some(perk) = perk {
            prompt.push_str(&format!("계승 특성: {perk}\n"));
        }

        prompt.push_str("\n이해했다면 짧게 확인만 하세요. 새 장면을 진행하지 마세요.");
        prompt
    }
}

fn push_hud_rules(prompt: &mut String) {
    prompt.push_str("매 응답 끝에 아래 형식의 상태 블록을 ```text 코드 블록으로 출력하세요.\n");
    prompt.push_str("```text\n");
    prompt.push_str(&format!("{LABEL_STATUS} HP: <체력> | 멘탈: <정신 상태>\n"));
    prompt.push_str(&format!("{LABEL_STATS} <능력치 요약>\n"));
    prompt.push_str(&format!("{LABEL_TAGS} <태그1>, <태그2>\n"));
    prompt.push_str(&format!("{LABEL_EQUIPMENT} <장비>\n"));
    prompt.push_str(&format!("{LABEL_NOTES} <현재 상황 한 줄 요약>\n"));
    prompt.push_str("```\n");
    prompt.push_str("변하지 않은 항목은 생략해도 됩니다.\n\n");
}

fn push_choice_rules(prompt: &mut String) {
    prompt.push_str("상태 블록 앞에 다음 행동 선택지를 번호 목록으로 제시하세요.\n");
    prompt.push_str("형식: `1. 행동`, `2. 행동` ... 마지막에 `0. 직접 입력`을 덧붙이세요.\n\n");
}

fn push_control_rules(prompt: &mut String) {
    prompt.push_str(&format!(
        "플레이어가 회차를 넘어 유지할 만한 특별한 능력을 얻으면 `{PERK_MARKER} 특성 이름]`을 한 번 출력하세요.\n"
    ));
    prompt.push_str(&format!(
        "플레이어가 사망하거나 이야기가 완전히 끝나면 마지막 묘사 뒤에 `{RESET_MARKER}`을 출력하세요.\n"
    ));
}

fn push_state_lines(prompt: &mut String, state: &GameState) {
    if state.hp.is_some() || state.mental.is_some() {
        prompt.push_str(&format!(
            "{LABEL_STATUS} HP: {} | 멘탈: {}\n",
            state.hp.as_deref().unwrap_or("?"),
            state.mental.as_deref().unwrap_or("?")
        ));
    }
    if let Some(stats) = &state.stats {
        prompt.push_str(&format!("{LABEL_STATS} {stats}\n"));
    }
    if let Some(tags) = &state.tags {
        prompt.push_str(&format!("{LABEL_TAGS} {}\n", tags.join(", ")));
    }
    if let Some(equipment) = &state.equipment {
        prompt.push_str(&format!("{LABEL_EQUIPMENT} {equipment}\n"));
    }
    if let Some(notes) = &state.notes {
        prompt.push_str(&format!("{LABEL_NOTES} {notes}\n"));
    }
}
