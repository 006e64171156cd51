//! Interactive command loop
//!
//! Thin glue over the service layer: collects raw input, calls into the
//! core with it and renders the returned data. This is the only place that
//! catches errors; every error kind is reported and the loop keeps
//! accepting commands.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::LedgerResult;
use crate::export::{export_expenses_csv, render_monthly_report};
use crate::models::Expense;
use crate::services::{
    BudgetService, CascadeAction, CategoryService, ExpensePatch, ExpenseService, ImportService,
    ReportService,
};
use crate::storage::Store;

const HELP: &str = "Commands: add list edit delete search summary stats export import clear \
                    backup restore undo categories setbudget budget report help quit";

/// Keywords that abort the prompt currently being answered
const CANCEL_WORDS: [&str; 4] = ["cancel", "c", "q", "quit"];

/// One interactive session over arbitrary input/output streams
pub struct Session<'a, R, W> {
    store: &'a Store,
    audit: AuditLogger,
    input: R,
    out: W,
}

/// Run the interactive loop until `quit` or end of input
pub fn run<R: BufRead, W: Write>(store: &Store, input: R, out: W) -> LedgerResult<()> {
    store.ensure_initialized()?;
    let audit = AuditLogger::new(store.paths().audit_log());
    let mut session = Session {
        store,
        audit,
        input,
        out,
    };
    session.run_loop()
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn run_loop(&mut self) -> LedgerResult<()> {
        writeln!(self.out, "spendlog expense tracker")?;
        writeln!(self.out, "{}", HELP)?;

        loop {
            let Some(command) = self.prompt(">> ")? else {
                break;
            };
            let command = command.to_lowercase();

            if matches!(command.as_str(), "q" | "quit" | "exit") {
                writeln!(self.out, "Goodbye")?;
                break;
            }

            let result = match command.as_str() {
                "" => Ok(()),
                "add" => self.cmd_add(),
                "list" => self.cmd_list(),
                "edit" => self.cmd_edit(),
                "delete" => self.cmd_delete(),
                "search" => self.cmd_search(),
                "summary" => self.cmd_summary(),
                "stats" => self.cmd_stats(),
                "export" => self.cmd_export(),
                "import" => self.cmd_import(),
                "clear" => self.cmd_clear(),
                "backup" => self.cmd_backup(),
                "restore" => self.cmd_restore(),
                "undo" => self.cmd_undo(),
                "categories" => self.cmd_categories(),
                "setbudget" => self.cmd_setbudget(),
                "budget" => self.cmd_budget(),
                "report" => self.cmd_report(),
                "help" => writeln!(self.out, "{}", HELP).map_err(Into::into),
                _ => writeln!(self.out, "Unknown command. Type help").map_err(Into::into),
            };

            if let Err(e) = result {
                writeln!(self.out, "Error: {}", e)?;
            }
        }

        Ok(())
    }

    // === prompting helpers ===

    /// Read one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> LedgerResult<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until a valid amount is entered; `None` on cancel or EOF
    fn prompt_amount(&mut self, text: &str) -> LedgerResult<Option<String>> {
        loop {
            let Some(raw) = self.prompt(text)? else {
                return Ok(None);
            };
            if CANCEL_WORDS.contains(&raw.to_lowercase().as_str()) {
                return Ok(None);
            }
            match crate::models::Money::parse(&raw) {
                Ok(_) => return Ok(Some(raw)),
                Err(e) => writeln!(self.out, "{} - type 'cancel' to abort", e)?,
            }
        }
    }

    /// Prompt until a valid date or blank; `Some(None)` means "use today",
    /// outer `None` means cancelled
    fn prompt_date(&mut self, text: &str) -> LedgerResult<Option<Option<String>>> {
        loop {
            let Some(raw) = self.prompt(text)? else {
                return Ok(None);
            };
            if raw.is_empty() {
                return Ok(Some(None));
            }
            if CANCEL_WORDS.contains(&raw.to_lowercase().as_str()) {
                return Ok(None);
            }
            match crate::models::dates::parse_to_iso(&raw) {
                Ok(_) => return Ok(Some(Some(raw))),
                Err(e) => writeln!(self.out, "{} - type 'cancel' to abort", e)?,
            }
        }
    }

    fn log(&self, action: &str, detail: String) {
        // Best-effort: an unwritable audit log never fails the command
        let _ = self.audit.log(&AuditEntry::now(action, detail));
    }

    fn print_expense(&mut self, e: &Expense) -> LedgerResult<()> {
        let date = e.date.get(..10).unwrap_or(&e.date);
        writeln!(
            self.out,
            "{} | {} | {:<12} | {:>10} | {}",
            e.id.short(),
            date,
            truncate(&e.category, 12),
            e.amount.to_string(),
            e.note
        )?;
        Ok(())
    }

    // === commands ===

    fn cmd_add(&mut self) -> LedgerResult<()> {
        let Some(amount) = self.prompt_amount("Amount: ")? else {
            return self.cancelled();
        };
        let Some(category) = self.prompt("Category (or blank for Misc): ")? else {
            return self.cancelled();
        };
        let Some(note) = self.prompt("Note (optional): ")? else {
            return self.cancelled();
        };
        let Some(date) = self.prompt_date("Date (YYYY-MM-DD or blank for today): ")? else {
            return self.cancelled();
        };

        let expenses = ExpenseService::new(self.store);
        let expense = expenses.create(&amount, &category, &note, date.as_deref())?;
        writeln!(self.out, "Saved {}", expense.id.short())?;
        self.log(
            "add",
            format!("expense {} {} {}", expense.id.short(), expense.amount, expense.category),
        );

        if let Some(alert) = BudgetService::new(self.store).check_alert(&expense)? {
            writeln!(
                self.out,
                "Warning: {} budget exceeded. Spent {} budget {}",
                alert.month, alert.spent, alert.budget
            )?;
        }
        Ok(())
    }

    fn cmd_list(&mut self) -> LedgerResult<()> {
        let expenses = ExpenseService::new(self.store).list(Some(10))?;
        if expenses.is_empty() {
            writeln!(self.out, "No expenses")?;
            return Ok(());
        }
        for e in &expenses {
            self.print_expense(e)?;
        }
        writeln!(self.out, "Showing {} expense(s)", expenses.len())?;
        Ok(())
    }

    fn cmd_edit(&mut self) -> LedgerResult<()> {
        let Some(prefix) = self.prompt("ID prefix: ")? else {
            return self.cancelled();
        };
        if prefix.is_empty() {
            writeln!(self.out, "Prefix required")?;
            return Ok(());
        }

        let service = ExpenseService::new(self.store);
        let Some(current) = service.find_by_id_prefix(&prefix)? else {
            writeln!(self.out, "Not found")?;
            return Ok(());
        };
        write!(self.out, "Current: ")?;
        self.print_expense(&current)?;

        let amount = self.prompt(&format!(
            "Amount [{}] (blank to keep): ",
            current.amount.canonical()
        ))?;
        let category = self.prompt(&format!("Category [{}] (blank to keep): ", current.category))?;
        let note = self.prompt(&format!("Note [{}] (blank to keep): ", current.note))?;
        let date = self.prompt(&format!(
            "Date [{}] (blank to keep): ",
            current.date.get(..10).unwrap_or(&current.date)
        ))?;

        let patch = ExpensePatch {
            amount: amount.filter(|s| !s.is_empty()),
            category: category.filter(|s| !s.is_empty()),
            note: note.filter(|s| !s.is_empty()),
            date: date.filter(|s| !s.is_empty()),
        };

        let outcome = service.update(current.id, patch)?;
        for rejected in &outcome.rejected {
            writeln!(
                self.out,
                "Invalid {}; skipping {} update ({})",
                rejected.field, rejected.field, rejected.reason
            )?;
        }
        writeln!(self.out, "Updated")?;
        self.log("edit", format!("expense {}", outcome.expense.id.short()));
        Ok(())
    }

    fn cmd_delete(&mut self) -> LedgerResult<()> {
        let Some(prefix) = self.prompt("ID prefix to delete: ")? else {
            return self.cancelled();
        };
        if prefix.is_empty() {
            writeln!(self.out, "Prefix required")?;
            return Ok(());
        }

        let service = ExpenseService::new(self.store);
        let matches = service.find_all_by_id_prefix(&prefix)?;
        if matches.is_empty() {
            writeln!(self.out, "No matches")?;
            return Ok(());
        }
        for e in &matches {
            self.print_expense(e)?;
        }

        let confirm = self.prompt(&format!(
            "Delete {} item(s)? Type 'yes' to confirm: ",
            matches.len()
        ))?;
        if confirm.as_deref() != Some("yes") {
            writeln!(self.out, "Aborted")?;
            return Ok(());
        }

        let removed = service.delete_by_id_prefix(&prefix)?;
        writeln!(self.out, "Deleted {}", removed)?;
        self.log("delete", format!("{} expense(s) by prefix {}", removed, prefix));
        Ok(())
    }

    fn cmd_search(&mut self) -> LedgerResult<()> {
        let Some(term) = self.prompt("Search term (category/note/amount): ")? else {
            return self.cancelled();
        };
        if term.is_empty() {
            writeln!(self.out, "Empty")?;
            return Ok(());
        }

        let results = ExpenseService::new(self.store).search(&term)?;
        if results.is_empty() {
            writeln!(self.out, "No results")?;
            return Ok(());
        }
        for e in &results {
            self.print_expense(e)?;
        }
        Ok(())
    }

    fn cmd_summary(&mut self) -> LedgerResult<()> {
        let totals = ReportService::new(self.store).monthly_totals()?;
        if totals.is_empty() {
            writeln!(self.out, "No data")?;
            return Ok(());
        }
        for (month, total) in totals.iter().rev() {
            writeln!(self.out, "{} {}", month, total)?;
        }
        Ok(())
    }

    fn cmd_stats(&mut self) -> LedgerResult<()> {
        let stats = ReportService::new(self.store).stats()?;
        writeln!(self.out, "Count: {}", stats.count)?;
        writeln!(self.out, "Total: {}", stats.total)?;
        writeln!(self.out, "Average: {}", stats.average)?;
        writeln!(self.out, "Top categories:")?;
        for (category, total) in &stats.top_categories {
            writeln!(self.out, "  {} {}", category, total)?;
        }
        Ok(())
    }

    fn cmd_export(&mut self) -> LedgerResult<()> {
        let Some(path) = self.prompt("Export path [expenses_export.csv]: ")? else {
            return self.cancelled();
        };
        let path = default_path(&path, "expenses_export.csv");

        let data = self.store.load()?;
        if data.expenses.is_empty() {
            writeln!(self.out, "No data")?;
            return Ok(());
        }

        let file = std::fs::File::create(&path)?;
        export_expenses_csv(file, &data.expenses)?;
        writeln!(self.out, "Exported to {}", path.display())?;
        Ok(())
    }

    fn cmd_import(&mut self) -> LedgerResult<()> {
        let Some(path) = self.prompt("CSV path: ")? else {
            return self.cancelled();
        };
        if path.is_empty() {
            writeln!(self.out, "Path required")?;
            return Ok(());
        }

        let summary = ImportService::new(self.store).import_csv_file(&PathBuf::from(&path))?;
        writeln!(
            self.out,
            "Imported {} ({} duplicate(s), {} invalid)",
            summary.imported, summary.duplicates, summary.invalid
        )?;
        self.log("import", format!("{} row(s) from {}", summary.imported, path));
        Ok(())
    }

    fn cmd_clear(&mut self) -> LedgerResult<()> {
        let confirm = self.prompt("Type DELETE to confirm full reset: ")?;
        if confirm.as_deref() != Some("DELETE") {
            writeln!(self.out, "Aborted")?;
            return Ok(());
        }
        self.store.clear()?;
        writeln!(self.out, "Cleared")?;
        self.log("clear", "full reset".into());
        Ok(())
    }

    fn cmd_backup(&mut self) -> LedgerResult<()> {
        let Some(path) = self.prompt("Backup path [expenses.backup.json]: ")? else {
            return self.cancelled();
        };
        let path = if path.is_empty() {
            self.store.paths().backup_file()
        } else {
            PathBuf::from(path)
        };

        self.store.backup_to(&path)?;
        writeln!(self.out, "Backup saved to {}", path.display())?;
        Ok(())
    }

    fn cmd_restore(&mut self) -> LedgerResult<()> {
        let Some(path) = self.prompt("Backup path to restore [expenses.backup.json]: ")? else {
            return self.cancelled();
        };
        let path = if path.is_empty() {
            self.store.paths().backup_file()
        } else {
            PathBuf::from(path)
        };
        if !path.exists() {
            writeln!(self.out, "Backup not found")?;
            return Ok(());
        }

        let confirm = self.prompt(&format!(
            "This will replace current data with {}. Type YES to confirm: ",
            path.display()
        ))?;
        if confirm.as_deref() != Some("YES") {
            writeln!(self.out, "Aborted")?;
            return Ok(());
        }

        self.store.restore_from(&path)?;
        writeln!(self.out, "Restored from {}", path.display())?;
        self.log("restore", format!("from {}", path.display()));
        Ok(())
    }

    fn cmd_undo(&mut self) -> LedgerResult<()> {
        if self.store.undo_last()? {
            writeln!(self.out, "Undo successful")?;
            self.log("undo", "reloaded backup slot".into());
        } else {
            writeln!(self.out, "No backup to undo")?;
        }
        Ok(())
    }

    fn cmd_categories(&mut self) -> LedgerResult<()> {
        let service = CategoryService::new(self.store);
        // Restored or imported data may use categories the registry missed
        service.sync_from_usage()?;
        loop {
            let categories = service.list()?;
            if categories.is_empty() {
                writeln!(self.out, "Categories: (none)")?;
            } else {
                writeln!(self.out, "Categories: {}", categories.join(", "))?;
            }

            let Some(choice) = self.prompt("[a]dd [r]emove [q]uit: ")? else {
                return Ok(());
            };
            match choice.to_lowercase().as_str() {
                "a" | "add" => {
                    let Some(name) = self.prompt("New category: ")? else {
                        return Ok(());
                    };
                    if name.is_empty() {
                        continue;
                    }
                    service.add(&name)?;
                    self.log("categories", format!("added {}", name));
                }
                "r" | "remove" => self.remove_category(&service)?,
                _ => return Ok(()),
            }
        }
    }

    fn remove_category(&mut self, service: &CategoryService) -> LedgerResult<()> {
        let Some(name) = self.prompt("Category to remove: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            return Ok(());
        }

        let linked = service.linked_count(&name)?;
        let action = if linked == 0 {
            CascadeAction::Abort // unreferenced names are removed regardless
        } else {
            writeln!(self.out, "{} expense(s) use this category.", linked)?;
            let Some(choice) = self.prompt(
                "Type [d]elete to remove those expenses, [r]eassign to another category, \
                 or anything else to cancel: ",
            )?
            else {
                return Ok(());
            };
            match choice.to_lowercase().as_str() {
                "d" | "delete" => CascadeAction::Delete,
                "r" | "reassign" => {
                    let Some(new_name) = self.prompt("New category name: ")? else {
                        return Ok(());
                    };
                    if new_name.is_empty() {
                        writeln!(self.out, "No new category provided. Cancelled.")?;
                        return Ok(());
                    }
                    CascadeAction::Reassign(new_name)
                }
                _ => CascadeAction::Abort,
            }
        };

        match service.remove(&name, action.clone()) {
            Ok(outcome) if outcome.removed => {
                writeln!(self.out, "Category removed ({} expense(s) affected).", outcome.affected)?;
                self.log("categories", format!("removed {} ({:?})", name, action));
            }
            Ok(_) => writeln!(self.out, "Cancelled removal.")?,
            Err(e) if e.is_not_found() => writeln!(self.out, "Category not found.")?,
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn cmd_setbudget(&mut self) -> LedgerResult<()> {
        let Some(month) = self.prompt("Budget month (YYYY-MM): ")? else {
            return self.cancelled();
        };
        let Some(amount) = self.prompt("Budget amount: ")? else {
            return self.cancelled();
        };

        let (month, amount) = BudgetService::new(self.store).set(&month, &amount)?;
        writeln!(self.out, "Budget set")?;
        self.log("setbudget", format!("{} = {}", month, amount));
        Ok(())
    }

    fn cmd_budget(&mut self) -> LedgerResult<()> {
        let Some(raw) = self.prompt("Month (YYYY-MM) or blank for current: ")? else {
            return self.cancelled();
        };
        let month = if raw.is_empty() {
            crate::models::MonthKey::current()
        } else {
            raw.parse()?
        };

        let status = BudgetService::new(self.store).status(&month)?;
        writeln!(self.out, "Month: {}", status.month)?;
        writeln!(self.out, "Spent: {}", status.spent)?;
        match status.budget {
            Some(budget) => writeln!(self.out, "Budget: {}", budget)?,
            None => writeln!(self.out, "Budget: Not set")?,
        }
        if let Some(remaining) = status.remaining {
            writeln!(self.out, "Remaining: {}", remaining)?;
            if status.exceeded {
                writeln!(self.out, "Alert: Budget exceeded by {}", -remaining)?;
            }
        }
        Ok(())
    }

    fn cmd_report(&mut self) -> LedgerResult<()> {
        let totals = ReportService::new(self.store).monthly_totals()?;
        let report = render_monthly_report(&totals);

        let Some(path) = self.prompt("Report file [report.txt]: ")? else {
            return self.cancelled();
        };
        let path = default_path(&path, "report.txt");

        std::fs::write(&path, report)?;
        writeln!(self.out, "Report saved to {}", path.display())?;
        Ok(())
    }

    fn cancelled(&mut self) -> LedgerResult<()> {
        writeln!(self.out, "Cancelled")?;
        Ok(())
    }
}

fn default_path(raw: &str, default: &str) -> PathBuf {
    if raw.is_empty() {
        PathBuf::from(default)
    } else {
        PathBuf::from(raw)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use tempfile::TempDir;

    fn run_session(store: &Store, script: &str) -> String {
        let mut out = Vec::new();
        run(store, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn test_store() -> (TempDir, Store) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, Store::new(paths))
    }

    #[test]
    fn test_help_and_quit() {
        let (_temp_dir, store) = test_store();
        let out = run_session(&store, "help\nquit\n");
        assert!(out.contains("Commands: add list edit"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_eof_ends_loop() {
        let (_temp_dir, store) = test_store();
        let out = run_session(&store, "");
        assert!(out.contains("spendlog expense tracker"));
    }

    #[test]
    fn test_add_and_list() {
        let (_temp_dir, store) = test_store();
        let out = run_session(
            &store,
            "add\n12.50\nFood\nlunch\n2024-03-01\nlist\nquit\n",
        );
        assert!(out.contains("Saved "));
        assert!(out.contains("Food"));
        assert!(out.contains("12.50"));

        assert_eq!(store.load().unwrap().expenses.len(), 1);
    }

    #[test]
    fn test_add_reprompts_on_bad_amount_then_cancels() {
        let (_temp_dir, store) = test_store();
        let out = run_session(&store, "add\nnot-money\ncancel\nquit\n");
        assert!(out.contains("Invalid amount"));
        assert!(out.contains("Cancelled"));
        assert!(store.load().unwrap().expenses.is_empty());
    }

    #[test]
    fn test_budget_alert_after_add() {
        let (_temp_dir, store) = test_store();
        let out = run_session(
            &store,
            "setbudget\n2024-03\n15.00\n\
             add\n12.50\nFood\n\n2024-03-01\n\
             add\n7.00\nFood\n\n2024-03-15\n\
             quit\n",
        );
        assert!(out.contains("Warning: 2024-03 budget exceeded. Spent 19.50 budget 15.00"));
    }

    #[test]
    fn test_budget_status_output() {
        let (_temp_dir, store) = test_store();
        let out = run_session(
            &store,
            "add\n12.50\nFood\n\n2024-03-01\n\
             add\n7.00\nFood\n\n2024-03-15\n\
             setbudget\n2024-03\n15.00\n\
             budget\n2024-03\n\
             quit\n",
        );
        assert!(out.contains("Spent: 19.50"));
        assert!(out.contains("Remaining: -4.50"));
        assert!(out.contains("Alert: Budget exceeded by 4.50"));
    }

    #[test]
    fn test_unknown_command_keeps_loop_alive() {
        let (_temp_dir, store) = test_store();
        let out = run_session(&store, "frobnicate\nhelp\nquit\n");
        assert!(out.contains("Unknown command"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_error_is_reported_and_loop_continues() {
        let (_temp_dir, store) = test_store();
        // Malformed month makes setbudget fail; the loop must survive
        let out = run_session(&store, "setbudget\nMarch\n10\nhelp\nquit\n");
        assert!(out.contains("Error: Invalid date"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_category_cascade_reassign_via_prompts() {
        let (_temp_dir, store) = test_store();
        let out = run_session(
            &store,
            "add\n5\nFood\n\n2024-03-01\n\
             categories\nr\nFood\nr\nGroceries\nq\n\
             quit\n",
        );
        assert!(out.contains("1 expense(s) use this category."));
        assert!(out.contains("Category removed (1 expense(s) affected)."));

        let data = store.load().unwrap();
        assert_eq!(data.expenses[0].category, "Groceries");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_temp_dir, store) = test_store();
        let session = "add\n5\nFood\n\n2024-03-01\nquit\n";
        run_session(&store, session);
        let id_prefix = store.load().unwrap().expenses[0].id.short();

        let out = run_session(&store, &format!("delete\n{}\nno\nquit\n", id_prefix));
        assert!(out.contains("Aborted"));
        assert_eq!(store.load().unwrap().expenses.len(), 1);

        let out = run_session(&store, &format!("delete\n{}\nyes\nquit\n", id_prefix));
        assert!(out.contains("Deleted 1"));
        assert!(store.load().unwrap().expenses.is_empty());
    }

    #[test]
    fn test_clear_requires_exact_keyword() {
        let (_temp_dir, store) = test_store();
        run_session(&store, "add\n5\nFood\n\n2024-03-01\nquit\n");

        let out = run_session(&store, "clear\ndelete\nquit\n");
        assert!(out.contains("Aborted"));
        assert_eq!(store.load().unwrap().expenses.len(), 1);

        let out = run_session(&store, "clear\nDELETE\nquit\n");
        assert!(out.contains("Cleared"));
        assert!(store.load().unwrap().expenses.is_empty());
    }

    #[test]
    fn test_undo_reverts_last_mutation() {
        let (_temp_dir, store) = test_store();
        run_session(
            &store,
            "add\n5\nFood\n\n2024-03-01\nadd\n7\nFood\n\n2024-03-02\nquit\n",
        );
        assert_eq!(store.load().unwrap().expenses.len(), 2);

        let out = run_session(&store, "undo\nquit\n");
        assert!(out.contains("Undo successful"));
        assert_eq!(store.load().unwrap().expenses.len(), 1);
    }

    #[test]
    fn test_audit_log_records_mutations() {
        let (_temp_dir, store) = test_store();
        run_session(&store, "add\n5\nFood\n\n2024-03-01\nquit\n");

        let logger = AuditLogger::new(store.paths().audit_log());
        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "add");
    }
}
