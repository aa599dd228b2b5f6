// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Prompt construction for the classifier

use super::ClassificationRequest;

/// Instruction contract sent with every request
pub const SYSTEM_INSTRUCTION: &str = "\
You classify files for a document organizer. You only see a short text preview \
of each file; you cannot read or move files yourself.

For every request you receive a filename, its extension, its parent folder, a \
text preview (possibly incomplete) and a fixed list of allowed categories.

Rules:
1. Pick the single most appropriate category. Use ONLY a category from the \
allowed list; never invent one. If unsure, choose the closest one and lower \
your confidence.
2. Suggest a subfolder name: plain English words, no special characters, no \
file extension, at most 3 words, Title Case (for example \"College Notes\" or \
\"Bank Statements\").
3. Write a one-line summary of what the file contains.
4. Give a confidence score between 0.0 and 1.0. If the preview is empty or \
meaningless, still make a best guess but keep confidence below 0.5.
5. Reply with a single JSON object and nothing else: no explanations, no \
questions, no markdown, no code fences. Use exactly these keys:

{\"category\": \"<allowed category>\", \"subfolder\": \"<subfolder name>\", \
\"summary\": \"<one line summary>\", \"confidence\": <number between 0.0 and 1.0>}";

/// Render the per-file prompt
pub fn build_prompt(request: &ClassificationRequest) -> String {
    format!(
        "Analyze the following file for organization.\n\n\
         Filename: {}\n\
         Extension: {}\n\
         Parent Folder: {}\n\n\
         Text Preview:\n{}\n\n\
         Allowed Categories:\n{}\n",
        request.file_name,
        request.extension,
        request.parent_folder,
        request.preview,
        request.categories.join(", "),
    )
}
