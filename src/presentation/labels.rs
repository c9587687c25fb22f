use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::risk::RiskLevel;

/// Report language. Thai is the tool's original audience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "th")]
    Thai,
    #[serde(alias = "en")]
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "th" | "thai" => Ok(Language::Thai),
            "en" | "english" => Ok(Language::English),
            _ => Err(format!("Unknown language: {s} (expected th or en)")),
        }
    }
}

/// Every user-facing string of the report in one language.
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub results_heading: &'static str,
    pub risk_heading: &'static str,
    pub color_panel: &'static str,
    pub texture_panel: &'static str,
    pub color_abnormal: &'static str,
    pub color_normal: &'static str,
    pub texture_abnormal: &'static str,
    pub texture_normal: &'static str,
    pub risk_low: &'static str,
    pub risk_medium: &'static str,
    pub risk_high: &'static str,
    pub color_diagnostic: &'static str,
    pub texture_diagnostic: &'static str,
    pub disclaimer_heading: &'static str,
    pub disclaimer: [&'static str; 2],
    pub guide_heading: &'static str,
    pub guide: [&'static str; 4],
}

static THAI: Labels = Labels {
    title: "ระบบวิเคราะห์โอกาสปนเปื้อน BY2 ในทุเรียน",
    results_heading: "ผลการวิเคราะห์",
    risk_heading: "ระดับความเสี่ยงการปนเปื้อน",
    color_panel: "สีของเปลือกและหนาม",
    texture_panel: "ลักษณะของสีพื้นผิว",
    color_abnormal: "พบสีเหลืองผิดปกติ!",
    color_normal: "สีปกติ",
    texture_abnormal: "พบพื้นผิวเรียบผิดปกติ!",
    texture_normal: "พื้นผิวปกติ",
    risk_low: "ความเสี่ยงต่ำ",
    risk_medium: "ความเสี่ยงปานกลาง",
    risk_high: "ความเสี่ยงสูง",
    color_diagnostic: "การวิเคราะห์สี (HSV)",
    texture_diagnostic: "การวิเคราะห์พื้นผิว (LBP)",
    disclaimer_heading: "หมายเหตุ",
    disclaimer: [
        "การวิเคราะห์นี้เป็นการประเมินเบื้องต้น อาจมีความคลาดเคลื่อนขึ้นอยู่กับคุณภาพของภาพ",
        "กรุณาใช้ควบคู่กับการตรวจสอบด้วยตาเปล่า",
    ],
    guide_heading: "คำแนะนำการใช้งาน",
    guide: [
        "ระยะถ่ายภาพ: ควรอยู่ห่างจากทุเรียนประมาณ 30-50 ซม.",
        "มุมกล้อง: ถ่ายจากด้านบนตรงๆ หรือเอียงไม่เกิน 45 องศา",
        "แสง: ใช้แสงธรรมชาติหรือแสงไฟสีขาว หลีกเลี่ยงแสงสีเหลืองหรือแสงน้อย",
        "ความคมชัด: ภาพต้องไม่เบลอและต้องโฟกัสที่พื้นผิวของทุเรียน",
    ],
};

static ENGLISH: Labels = Labels {
    title: "Durian BY2 Contamination Risk Screening",
    results_heading: "Analysis results",
    risk_heading: "Contamination risk level",
    color_panel: "Rind and thorn color",
    texture_panel: "Surface texture",
    color_abnormal: "Abnormal yellow color detected!",
    color_normal: "Normal color",
    texture_abnormal: "Abnormally smooth surface detected!",
    texture_normal: "Normal texture",
    risk_low: "Low risk",
    risk_medium: "Medium risk",
    risk_high: "High risk",
    color_diagnostic: "Color analysis (HSV)",
    texture_diagnostic: "Texture analysis (LBP)",
    disclaimer_heading: "Note",
    disclaimer: [
        "This is a preliminary screening and may be inaccurate depending on image quality.",
        "Always combine it with a visual inspection.",
    ],
    guide_heading: "Photo guidelines",
    guide: [
        "Distance: keep about 30-50 cm from the durian.",
        "Angle: shoot straight from above or tilted no more than 45 degrees.",
        "Light: use daylight or white light; avoid yellow or dim light.",
        "Focus: the image must be sharp and focused on the rind.",
    ],
};

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::Thai => &THAI,
            Language::English => &ENGLISH,
        }
    }

    pub fn color_finding(&self, color_flag: bool) -> &'static str {
        if color_flag {
            self.color_abnormal
        } else {
            self.color_normal
        }
    }

    pub fn texture_finding(&self, texture_flag: bool) -> &'static str {
        if texture_flag {
            self.texture_abnormal
        } else {
            self.texture_normal
        }
    }

    pub fn risk_banner(&self, level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Low => self.risk_low,
            RiskLevel::Medium => self.risk_medium,
            RiskLevel::High => self.risk_high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("th".parse::<Language>(), Ok(Language::Thai));
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert_eq!(" en ".parse::<Language>(), Ok(Language::English));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Thai);
    }

    #[test]
    fn findings_follow_flags() {
        let labels = Labels::for_language(Language::English);
        assert_eq!(labels.color_finding(true), "Abnormal yellow color detected!");
        assert_eq!(labels.color_finding(false), "Normal color");
        assert_eq!(labels.texture_finding(true), "Abnormally smooth surface detected!");
        assert_eq!(labels.texture_finding(false), "Normal texture");
        assert_eq!(labels.risk_banner(RiskLevel::High), "High risk");

        let thai = Labels::for_language(Language::Thai);
        assert_eq!(thai.color_finding(true), "พบสีเหลืองผิดปกติ!");
        assert_eq!(thai.risk_banner(RiskLevel::Low), "ความเสี่ยงต่ำ");
    }

    #[test]
    fn deserializes_aliases() {
        let language: Language = serde_json::from_str("\"en\"").expect("alias");
        assert_eq!(language, Language::English);
        let language: Language = serde_json::from_str("\"thai\"").expect("name");
        assert_eq!(language, Language::Thai);
    }
}
