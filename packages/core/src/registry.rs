//! 班级码注册表

use std::collections::HashSet;

pub trait ClassroomRegistry: Send + Sync {
    fn is_valid(&self, code: &str) -> bool;
}

/// 固定的班级码表；比较前统一去空白并转大写
#[derive(Debug, Clone, Default)]
pub struct StaticClassroomRegistry {
    codes: HashSet<String>,
}

impl StaticClassroomRegistry {
    pub fn builtin() -> Self {
        Self::from_codes(["LUM123", "SUN456", "STAR789"])
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        registry.extend(codes);
        registry
    }

    pub fn extend<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.codes.extend(
            codes
                .into_iter()
                .map(|code| normalize_code(code.as_ref()))
                .filter(|code| !code.is_empty()),
        );
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl ClassroomRegistry for StaticClassroomRegistry {
    fn is_valid(&self, code: &str) -> bool {
        self.codes.contains(&normalize_code(code))
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes() {
        let registry = StaticClassroomRegistry::builtin();
        assert!(registry.is_valid("LUM123"));
        assert!(registry.is_valid(" lum123 "));
        assert!(!registry.is_valid("NOPE00"));
        assert!(!registry.is_valid(""));
    }

    #[test]
    fn test_extend_skips_blank_codes() {
        let mut registry = StaticClassroomRegistry::default();
        registry.extend(["  ", "abc1"]);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_valid("ABC1"));
    }
}
