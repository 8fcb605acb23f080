//! The declared input alphabet: a dense `String <-> u8` mapping in
//! declaration order (§4.5), built once from `"Game Inputs"`.

use frontier_core::config::InputSpec;

/// A fixed, declaration-ordered mapping between input symbols (e.g. `"L"`,
/// `"R"`, `"A+B"`) and the dense `u8` ids the engine carries internally.
#[derive(Debug, Clone)]
pub struct InputTable {
    symbols: Vec<String>,
}

impl InputTable {
    #[must_use]
    pub fn from_specs(specs: &[InputSpec]) -> Self {
        Self {
            symbols: specs.iter().map(|s| s.input.clone()).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn symbol(&self, id: u8) -> Option<&str> {
        self.symbols.get(id as usize).map(String::as_str)
    }

    #[must_use]
    pub fn id_of(&self, symbol: &str) -> Option<u8> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| i as u8)
    }

    /// Render a history of input ids as a space-separated symbol string,
    /// the solution-file format of §6.4.
    #[must_use]
    pub fn render(&self, history: &[u8]) -> String {
        history
            .iter()
            .map(|&id| self.symbol(id).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(symbols: &[&str]) -> Vec<InputSpec> {
        symbols
            .iter()
            .map(|s| InputSpec { input: (*s).to_string() })
            .collect()
    }

    #[test]
    fn ids_are_assigned_in_declaration_order() {
        let table = InputTable::from_specs(&specs(&[".", "L", "R"]));
        assert_eq!(table.id_of("."), Some(0));
        assert_eq!(table.id_of("L"), Some(1));
        assert_eq!(table.id_of("R"), Some(2));
        assert_eq!(table.symbol(2), Some("R"));
    }

    #[test]
    fn unknown_symbol_is_none() {
        let table = InputTable::from_specs(&specs(&["."]));
        assert_eq!(table.id_of("Z"), None);
    }

    #[test]
    fn render_joins_symbols_with_spaces() {
        let table = InputTable::from_specs(&specs(&[".", "L", "R"]));
        assert_eq!(table.render(&[2, 2, 1]), "R R L");
    }
}
