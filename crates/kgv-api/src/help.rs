/// Cheat-sheet returned by `help` and `?`.
pub const HELP_TEXT: &str = "\
Queries (keywords are case-insensitive, values compare case-insensitively):
  node:<key>=<value>          highlight nodes whose <key> equals <value>
  edge:<key>=<value>          highlight edges whose <key> equals <value>
  filter node:<key>=<value>   keep matching nodes, their neighbors and incident edges
  filter edge:<key>=<value>   keep matching edges and their endpoints
  reset                       remove every filter
  help, ?                     show this text

Node keys: id, label, name, type, kind, iri, bnode, value, lang, datatype, key,
           or any property.
Edge keys: id, from, to, label, iri, or any property.

Filters stack: each one narrows what the previous ones left visible.
A search or filter without an exact match lists values that contain the text.";
