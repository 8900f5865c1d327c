use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhTw => "zh-TW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::ZhTw => "繁體中文",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Locale::En => Locale::ZhTw,
            Locale::ZhTw => Locale::En,
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::En => EN,
            Locale::ZhTw => ZH_TW,
        }
    }
}

/// Look up `key`, falling back to English and then to the key itself.
pub fn tr<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(locale.table(), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

/// [`tr`] with `{name}` placeholders filled from `vars`.
pub fn tr_with(locale: Locale, key: &str, vars: &[(&str, &str)]) -> String {
    let mut text = tr(locale, key).to_string();
    for (name, value) in vars {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

static EN: &[(&str, &str)] = &[
    ("appName", "Pickleball Scorekeeper"),
    ("back", "Back"),
    ("language", "Language"),
    // home
    ("chooseMode", "Choose Mode"),
    ("normalMode", "Normal Mode"),
    ("advancedMode", "Advanced Mode"),
    ("simpleMode", "Simple Mode"),
    ("matchHistory", "Match History"),
    ("chooseGameType", "Choose Game Type"),
    ("singles", "Singles"),
    ("doubles", "Doubles"),
    // setup
    ("setup", "Setup"),
    ("team", "Team"),
    ("playerPlaceholder", "Player {num}"),
    ("playerPlaceholderWithTeam", "Player {teamNum}{letter}"),
    ("selectFirstServer", "Select First Server"),
    ("errorPlayerName", "Please enter a name for all players"),
    ("startMatch", "Start Match"),
    // game
    ("server", "SERVER"),
    ("receiver", "RECEIVER"),
    ("undo", "Undo"),
    ("resetGame", "Reset Game"),
    ("winner", "WINNER"),
    ("error", "ERROR"),
    ("rallyPlayerPrompt", "1. Select Player Who Ended Rally"),
    ("outcomePrompt", "2. Select Outcome"),
    ("reasonPrompt", "3. Select Reason"),
    ("fontSize", "Font Size"),
    ("pointBtn", "Point"),
    ("faultBtn", "Fault"),
    ("lockServer", "Lock Server"),
    ("unlockServer", "Unlock Server"),
    ("serverLocked", "Server selection is locked"),
    ("compactMode", "Compact"),
    // game over
    ("winnerTitle", "WINNER!"),
    ("congratulations", "Congratulations"),
    ("wonMatch", "You've won the match!"),
    ("playAgain", "Play Again"),
    ("matchAnalysis", "Match Analysis"),
    ("matchHistoryFor", "Match History: {playerName}"),
    ("noRecordedActions", "No recorded actions for this player."),
    ("backToSummary", "Back to Summary"),
    ("winnersLabel", "Winners"),
    ("errorsLabel", "Errors"),
    ("scoreTrend", "Score Trend"),
    ("scoreLabel", "Score"),
    ("rallyLabel", "Rally"),
    ("shareResult", "Share Match Data"),
    ("shareTitle", "Pickleball Match Result"),
    ("shareTextPattern", "{winnerNames} def. {loserNames}\nScore: {score}"),
    ("sharedResult", "Shared Result"),
    ("invalidShareLink", "Could not read the shared match link"),
    // history
    ("matchDetails", "Match Details"),
    ("date", "Date"),
    ("mode", "Mode"),
    ("winnerLabel", "Winner"),
    ("backToHistory", "Back to History"),
    ("noMatchesPlayed", "No matches played yet."),
    ("details", "Details"),
    ("backToHome", "Back to Home"),
    ("clearHistory", "Clear History"),
    (
        "clearHistoryConfirm",
        "Are you sure you want to clear all match history? This action cannot be undone. (y/n)",
    ),
    ("help", "Help"),
    ("tabHome", "Home"),
    ("tabMatch", "Match"),
    ("tabResult", "Result"),
    ("tabHistory", "History"),
    ("pressEnter", "Press Enter to start"),
    ("keysGlobal", "? help  \" logs  F full screen  q quit"),
    // key hints
    (
        "keysHome",
        "j/k move  h/l singles/doubles  Enter select  t language  c compact  ? help  q quit",
    ),
    (
        "keysSetup",
        "type name  Up/Down field  Tab first server  Enter start  Esc back",
    ),
    ("keysGameNormal", "+/space point  - correct  1-4 player  v set server  x lock"),
    ("keysGameSimple", "p/space point  f fault  1-4 player  v set server  x lock"),
    ("keysGameAdvanced", "1-4 player  w winner  e error  then 1-5 reason  Esc cancel"),
    ("keysGameCommon", "u undo  [/] font size  c compact  R reset"),
    ("keysGameOver", "s share  j/k player  Enter details  Esc summary  h history  n home"),
    ("keysHistory", "j/k move  Enter details  s share  Esc back  D clear"),
    // reasons
    ("forehand", "Forehand"),
    ("backhand", "Backhand"),
    ("serve", "Serve"),
    ("volley", "Volley"),
    ("smash", "Smash"),
    ("net", "Net"),
    ("out", "Out"),
    // modes
    ("SINGLES", "Singles"),
    ("DOUBLES", "Doubles"),
    ("ADVANCED_SINGLES", "Advanced Singles"),
    ("ADVANCED_DOUBLES", "Advanced Doubles"),
    ("SIMPLE_SINGLES", "Simple Singles"),
    ("SIMPLE_DOUBLES", "Simple Doubles"),
];

static ZH_TW: &[(&str, &str)] = &[
    ("appName", "匹克球計分小幫手"),
    ("back", "返回"),
    ("language", "語言"),
    ("chooseMode", "選擇模式"),
    ("normalMode", "普通模式"),
    ("advancedMode", "進階模式"),
    ("simpleMode", "簡易模式"),
    ("matchHistory", "比賽歷史"),
    ("chooseGameType", "選擇比賽類型"),
    ("singles", "單打"),
    ("doubles", "雙打"),
    ("setup", "設定"),
    ("team", "隊伍"),
    ("playerPlaceholder", "選手 {num}"),
    ("playerPlaceholderWithTeam", "選手 {teamNum}{letter}"),
    ("selectFirstServer", "選擇先發球員"),
    ("errorPlayerName", "請為所有選手輸入姓名"),
    ("startMatch", "開始比賽"),
    ("server", "發球員"),
    ("receiver", "接發球員"),
    ("undo", "復原"),
    ("resetGame", "重設比賽"),
    ("winner", "致勝球"),
    ("error", "失誤"),
    ("rallyPlayerPrompt", "1. 選擇結束此回合的球員"),
    ("outcomePrompt", "2. 選擇結果"),
    ("reasonPrompt", "3. 選擇原因"),
    ("fontSize", "字體大小"),
    ("pointBtn", "得分"),
    ("faultBtn", "失誤"),
    ("lockServer", "鎖定發球員"),
    ("unlockServer", "解鎖發球員"),
    ("serverLocked", "發球員選擇已鎖定"),
    ("compactMode", "精簡"),
    ("winnerTitle", "獲勝！"),
    ("congratulations", "恭喜"),
    ("wonMatch", "您贏得了比賽！"),
    ("playAgain", "再玩一次"),
    ("matchAnalysis", "比賽分析"),
    ("matchHistoryFor", "比賽歷史: {playerName}"),
    ("noRecordedActions", "此選手無記錄的動作。"),
    ("backToSummary", "返回摘要"),
    ("winnersLabel", "致勝球"),
    ("errorsLabel", "失誤"),
    ("scoreTrend", "得分趨勢"),
    ("scoreLabel", "分數"),
    ("rallyLabel", "發球次數"),
    ("shareResult", "分享比賽數據"),
    ("shareTitle", "匹克球比賽結果"),
    ("shareTextPattern", "{winnerNames} 擊敗 {loserNames}\n比分: {score}"),
    ("sharedResult", "分享的結果"),
    ("invalidShareLink", "無法讀取分享的比賽連結"),
    ("matchDetails", "比賽詳情"),
    ("date", "日期"),
    ("mode", "模式"),
    ("winnerLabel", "獲勝者"),
    ("backToHistory", "返回歷史記錄"),
    ("noMatchesPlayed", "尚無比賽記錄。"),
    ("details", "詳情"),
    ("backToHome", "返回主畫面"),
    ("clearHistory", "清除歷史記錄"),
    (
        "clearHistoryConfirm",
        "您確定要清除所有比賽歷史記錄嗎？此操作無法復原。(y/n)",
    ),
    ("help", "說明"),
    ("tabHome", "主畫面"),
    ("tabMatch", "比賽"),
    ("tabResult", "結果"),
    ("tabHistory", "歷史"),
    ("pressEnter", "按 Enter 開始"),
    ("forehand", "正手拍"),
    ("backhand", "反手拍"),
    ("serve", "發球"),
    ("volley", "截擊"),
    ("smash", "殺球"),
    ("net", "掛網"),
    ("out", "出界"),
    ("SINGLES", "單打"),
    ("DOUBLES", "雙打"),
    ("ADVANCED_SINGLES", "進階單打"),
    ("ADVANCED_DOUBLES", "進階雙打"),
    ("SIMPLE_SINGLES", "簡易單打"),
    ("SIMPLE_DOUBLES", "簡易雙打"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_active_locale() {
        assert_eq!(tr(Locale::ZhTw, "net"), "掛網");
        assert_eq!(tr(Locale::En, "net"), "Net");
    }

    #[test]
    fn missing_keys_fall_back_to_english_then_key() {
        // key hints are only written in English
        assert_eq!(tr(Locale::ZhTw, "keysHistory"), tr(Locale::En, "keysHistory"));
        assert_eq!(tr(Locale::ZhTw, "noSuchKey"), "noSuchKey");
    }

    #[test]
    fn placeholders_are_filled() {
        let text = tr_with(
            Locale::En,
            "playerPlaceholderWithTeam",
            &[("teamNum", "2"), ("letter", "B")],
        );
        assert_eq!(text, "Player 2B");
    }

    #[test]
    fn locale_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Locale::ZhTw).unwrap(), "\"zh-TW\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }
}
