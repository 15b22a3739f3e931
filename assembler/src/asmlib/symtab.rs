use std::collections::HashMap;

use tracing::{Level, event};

use super::types::{ErrorKind, LineError, LineNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Definition {
    address: u32,
    line: LineNumber,
}

/// Maps label names (which are case-sensitive) to addresses.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    labels: HashMap<String, Definition>,
}

impl SymbolTable {
    pub(crate) fn define(
        &mut self,
        name: &str,
        address: u32,
        line: LineNumber,
    ) -> Result<(), LineError> {
        if let Some(previous) = self.labels.get(name) {
            return Err(LineError::new(
                line,
                ErrorKind::Syntax,
                format!(
                    "label '{name}' is already defined (at line {})",
                    previous.line
                ),
            ));
        }
        event!(Level::DEBUG, "label {name} = {address:#x}");
        self.labels
            .insert(name.to_string(), Definition { address, line });
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<u32> {
        self.labels.get(name).map(|def| def.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut symtab = SymbolTable::default();
        assert_eq!(symtab.lookup("loop"), None);
        assert_eq!(symtab.define("loop", 0x10, 3), Ok(()));
        assert_eq!(symtab.lookup("loop"), Some(0x10));
        assert_eq!(symtab.lookup("LOOP"), None);
    }

    #[test]
    fn test_duplicate_definition() {
        let mut symtab = SymbolTable::default();
        assert_eq!(symtab.define("x", 0, 1), Ok(()));
        let err = symtab.define("x", 4, 7).expect_err("duplicate should fail");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 7);
        assert!(err.msg.contains("line 1"), "{}", err.msg);
        assert_eq!(symtab.lookup("x"), Some(0));
    }
}
