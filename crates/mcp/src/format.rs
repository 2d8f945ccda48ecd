use chrono::{Datelike, NaiveDateTime, Timelike};

use liupan_common::{ABSENT_MARKER, BRANCHES, ChartResult, Gender, YearFate};

const LESSON_NAMES: [&str; 4] = ["一课", "二课", "三课", "四课"];
const TRANSMISSION_NAMES: [&str; 3] = ["初传", "中传", "末传"];

/// Renders a chart and year fate as the markdown report returned to the
/// client. Pure: identical inputs produce byte-identical output. Section
/// and row order is fixed; absent optional data drops whole rows or
/// sections rather than leaving blanks, except for hidden-stem cells.
pub fn format_chart(
    birth: NaiveDateTime,
    gender: Gender,
    chart: &ChartResult,
    year_fate: &YearFate,
) -> String {
    let mut out = String::new();

    out.push_str("# 大六壬排盘结果\n\n");

    // 基本信息
    out.push_str("## 基本信息\n\n");
    out.push_str("| 项目 | 内容 |\n");
    out.push_str("|------|------|\n");
    out.push_str(&format!("| **出生日期** | {} |\n", locale_date(birth)));
    out.push_str(&format!("| **出生时辰** | {} |\n", locale_time(birth)));
    out.push_str(&format!("| **性别** | {} |\n", gender.label()));
    if let Some(year) = &year_fate.year {
        out.push_str(&format!("| **年命** | {year} |\n"));
    }
    let info = &chart.date_info;
    out.push_str(&format!("| **八字** | {} |\n", info.bazi));
    out.push_str("|:---|:---|---:|\n");
    out.push_str(&format!("| **时空** | {} |\n", info.kong.join(" ")));
    out.push_str(&format!("| **月将** | {} |\n", info.yuejiang));
    out.push_str(&format!("| **旬** | {} |\n", info.xun));
    out.push_str(&format!("| **驿马** | {} |\n", info.yima));
    if !info.dingma.is_empty() && info.dingma != ABSENT_MARKER {
        out.push_str(&format!("| **丁马** | {} |\n", info.dingma));
    }
    if !info.tianma.is_empty() && info.tianma != ABSENT_MARKER {
        out.push_str(&format!("| **天马** | {} |\n", info.tianma));
    }
    out.push('\n');

    // 天地盘
    out.push_str("## 天地盘\n\n");
    out.push_str("| 位置 | 地盘 | 天盘 | 天将 |\n");
    out.push_str("|------|------|------|------|\n");
    for (i, branch) in BRANCHES.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            branch, chart.plate.earth[i], chart.plate.heaven[i], chart.plate.generals[i]
        ));
    }
    out.push('\n');

    // 四课
    out.push_str("## 四课\n\n");
    out.push_str("| 课名 | 内容 | 天将 |\n");
    out.push_str("|------|------|------|\n");
    for (name, lesson) in LESSON_NAMES.iter().zip(&chart.lessons) {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            name, lesson.text, lesson.general
        ));
    }
    out.push('\n');

    // 三传
    out.push_str("## 三传\n\n");
    out.push_str("| 传名 | 地支 | 天将 | 六亲 | 遁干 |\n");
    out.push_str("|------|------|------|------|------|\n");
    for (name, row) in TRANSMISSION_NAMES.iter().zip(&chart.transmissions.rows) {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            name, row.branch, row.general, row.relation, row.hidden_stem
        ));
    }
    out.push('\n');
    out.push_str(&format!("**课体**: {}\n\n", chart.transmissions.category));

    // 遁干
    out.push_str("## 遁干\n\n");
    out.push_str("| 地支 | 遁干 |\n");
    out.push_str("|------|------|\n");
    for branch in BRANCHES {
        let stem = chart
            .hidden_stems
            .get(branch)
            .map(String::as_str)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(" ");
        out.push_str(&format!("| {branch} | {stem} |\n"));
    }
    out.push('\n');

    // 神煞: whole section dropped when no annotation is present
    let spirits = chart.spirits.present();
    if !spirits.is_empty() {
        out.push_str("## 神煞\n\n");
        out.push_str("| 神煞 | 内容 |\n");
        out.push_str("|------|------|\n");
        for (label, value) in spirits {
            out.push_str(&format!("| **{label}** | {value} |\n"));
        }
        out.push('\n');
    }

    // 年命信息
    if year_fate.year.is_some() || year_fate.gender.is_some() || year_fate.cycle.is_some() {
        out.push_str("## 年命信息\n\n");
        out.push_str("| 项目 | 内容 |\n");
        out.push_str("|------|------|\n");
        if let Some(year) = &year_fate.year {
            out.push_str(&format!("| **年命** | {year} |\n"));
        }
        if let Some(gender) = &year_fate.gender {
            out.push_str(&format!("| **性别** | {gender} |\n"));
        }
        if let Some(cycle) = &year_fate.cycle {
            out.push_str(&format!("| **流年** | {cycle} |\n"));
        }
        out.push('\n');
    }

    out
}

/// zh-CN short date: unpadded `Y/M/D`.
fn locale_date(at: NaiveDateTime) -> String {
    format!("{}/{}/{}", at.year(), at.month(), at.day())
}

fn locale_time(at: NaiveDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}
