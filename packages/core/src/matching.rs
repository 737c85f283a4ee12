/// 去掉首尾空白并转小写
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 宽松匹配：规范化后任一方包含另一方即算匹配。
///
/// 识别结果常常多出前后的词 ("the cat")，也可能只截到一部分，所以两个方向都接受。
/// 空的识别结果永远不算匹配。
pub fn is_match(target: &str, spoken: &str) -> bool {
    let target = normalize(target);
    let spoken = normalize(spoken);
    if spoken.is_empty() || target.is_empty() {
        return false;
    }
    spoken.contains(&target) || target.contains(&spoken)
}
