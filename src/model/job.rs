use serde::{Deserialize, Serialize};

/// A selectable starting archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobClass {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl JobClass {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

pub fn default_jobs() -> Vec<JobClass> {
    vec![
        JobClass::new(
            "mercenary",
            "용병",
            "돈을 받고 싸우는 노련한 검객. 체력이 높고 전투에 능하다.",
        ),
        JobClass::new(
            "scholar",
            "학자",
            "금지된 문헌을 읽어 온 연구자. 정신력이 강하고 단서를 잘 찾는다.",
        ),
        JobClass::new(
            "scavenger",
            "넝마주이",
            "폐허를 뒤져 살아남은 생존자. 은신과 물자 조달에 뛰어나다.",
        ),
        JobClass::new(
            "medic",
            "의무병",
            "전장에서 사람을 살려 온 치료사. 응급처치와 약품에 정통하다.",
        ),
        JobClass::new(
            "exorcist",
            "퇴마사",
            "보이지 않는 것을 상대하는 자. 초자연적 위협에 강하지만 몸은 약하다.",
        ),
    ]
}

pub fn find_job(id: &str) -> Option<JobClass> {
    default_jobs().into_iter().find(|job| job.id == id)
}

/// Lines revealed one by one before the first scene.
pub const PROLOGUE_LINES: &[&str] = &[
    "세상이 무너진 지 일곱 해.",
    "살아남은 자들은 성벽 안에 숨었고, 성벽 밖은 더 이상 지도에 없다.",
    "당신은 오늘, 그 바깥으로 나간다.",
    "돌아올 수 있을지는 아무도 모른다.",
];
