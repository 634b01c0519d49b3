/// Column names and column lists shared by the entity processors.
/// These mirror the column layout of the retail ERP extracts.
use once_cell::sync::Lazy;

// Report names (used for logs, metrics labels and output files)
pub const PRODUCTS_REPORT: &str = "products";
pub const INVENTORY_REPORT: &str = "inventory";
pub const SALES_REPORT: &str = "sales";
pub const ECOMMERCE_REPORT: &str = "ecommerce";
pub const ENTRIES_REPORT: &str = "entries";

// Key columns
pub const PRODUCT: &str = "PRODUTO";
pub const PRODUCT_COLOR: &str = "COR_PRODUTO";
pub const SIZE: &str = "TAMANHO";
pub const BARCODE: &str = "CODIGO_BARRA";
pub const COLOR_CODE: &str = "COR";
pub const COLOR_DESCRIPTION: &str = "DESC_COR";
pub const PRODUCT_COLOR_DESCRIPTION: &str = "DESC_COR_PRODUTO";

/// Suffix of the display twin written next to every converted date column
pub const FORMATTED_SUFFIX: &str = "_FORMATADO";

// Inventory
pub const STOCK_QUANTITY: &str = "ESTOQUE";
pub const REPLACEMENT_COST: &str = "CUSTO_REPOSICAO1";
pub const STOCK_VALUE: &str = "VALOR_TOTAL_ESTOQUE";

// Sales
pub const QUANTITY: &str = "QTDE";
pub const CANCELLED_QUANTITY: &str = "QTDE_CANCELADA";
pub const NET_PRICE: &str = "PRECO_LIQUIDO";
pub const SALE_DISCOUNT: &str = "DESCONTO_VENDA";
pub const TICKET: &str = "TICKET";
pub const BRANCH_CODE: &str = "CODIGO_FILIAL";
pub const SALE_TOTAL: &str = "TOTAL_VENDA";
pub const SALE_TOTAL_QUANTITY: &str = "TOTAL_QTDE_VENDA";
pub const ITEM_EXCHANGE_QUANTITY: &str = "QTDE_TROCA_ITEM";
pub const ITEM_EXCHANGE_VALUE: &str = "VALOR_TROCA_ITEM";
pub const TICKET_EXCHANGE_QUANTITY: &str = "QTDE_TROCA_TICKET";
pub const TICKET_EXCHANGE_VALUE: &str = "VALOR_TROCA_TICKET";
pub const EXCHANGE_QUANTITY: &str = "QTDE_TROCA";
pub const EXCHANGE_VALUE: &str = "VALOR_TROCA";
pub const NET_VALUE: &str = "VALOR_LIQUIDO";

// E-commerce invoice item identity
pub const INVOICE_NUMBER: &str = "NF_SAIDA";
pub const INVOICE_SERIES: &str = "SERIE_NF";
pub const INVOICE_ITEM: &str = "ITEM";

pub const PRODUCT_DATE_COLUMNS: &[&str] = &[
    "DATA_REPOSICAO",
    "DATA_PARA_TRANSFERENCIA",
    "DATA_CADASTRAMENTO",
];

pub const INVENTORY_DATE_COLUMNS: &[&str] = &[
    "ULTIMA_SAIDA",
    "ULTIMA_ENTRADA",
    "DATA_PARA_TRANSFERENCIA",
    "DATA_AJUSTE",
];

pub const SALES_DATE_COLUMNS: &[&str] = &["DATA_VENDA"];

pub const ECOMMERCE_DATE_COLUMNS: &[&str] = &["EMISSAO", "DATA_SAIDA", "ENTREGA"];

pub const ENTRIES_DATE_COLUMNS: &[&str] = &["EMISSAO"];

/// Product attributes copied onto inventory rows
pub const INVENTORY_PRODUCT_ATTRIBUTES: &[&str] = &[
    "DESC_PRODUTO",
    "CUSTO_REPOSICAO1",
    "PRECO_REPOSICAO_1",
    "LINHA",
    "GRUPO_PRODUTO",
    "SUBGRUPO_PRODUTO",
    "GRADE",
    "GRIFFE",
    "COLECAO",
];

/// Product attributes copied onto stock entry rows
pub const ENTRIES_PRODUCT_ATTRIBUTES: &[&str] = &[
    "DESC_PRODUTO",
    "GRUPO_PRODUTO",
    "SUBGRUPO_PRODUTO",
    "LINHA",
    "COLECAO",
];

/// Output column order of the entries report
pub const ENTRIES_COLUMN_ORDER: &[&str] = &[
    "EMISSAO",
    "FILIAL",
    "ROMANEIO_PRODUTO",
    "PRODUTO",
    "DESC_PRODUTO",
    "COR_PRODUTO",
    "DESC_COR_PRODUTO",
    "QTDE_TOTAL",
    "GRUPO_PRODUTO",
    "SUBGRUPO_PRODUTO",
    "LINHA",
    "COLECAO",
];

pub const SALES_COLUMNS_TO_DROP: &[&str] = &[
    "TAMANHO",
    "PEDIDO",
    "DESCONTO_ITEM",
    "CODIGO_DESCONTO",
    "CODIGO_TAB_PRECO",
    "OPERACAO_VENDA",
    "FATOR_VENDA_LIQ",
    "VALOR_TIKET",
    "DESCONTO",
    "DATA_HORA_CANCELAMENTO",
    "QTDE_CANCELADA",
];

/// Cost history, per-size stock slots (ES1..ES48) and ERP bookkeeping columns
pub static INVENTORY_COLUMNS_TO_DROP: Lazy<Vec<String>> = Lazy::new(|| {
    let mut columns: Vec<String> = [
        "CUSTO_MEDIO1",
        "CUSTO_MEDIO2",
        "CUSTO_MEDIO3",
        "CUSTO_MEDIO4",
        "ULTIMO_CUSTO1",
        "ULTIMO_CUSTO2",
        "ULTIMO_CUSTO3",
        "ULTIMO_CUSTO4",
        "DATA_CUSTO_MEDIO",
        "DATA_ULT_CUSTO",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    columns.extend((1..=48).map(|i| format!("ES{}", i)));
    columns.extend(
        ["TIMESTAMP", "PRIMEIRA_ENTRADA", "LX_STATUS_REGISTRO", "LX_HASH"]
            .iter()
            .map(|c| c.to_string()),
    );
    columns
});

/// ERP technical columns that never make it into the products report
pub const PRODUCT_COLUMNS_TO_DROP: &[&str] = &[
    "CODIGO_PRECO", "MATERIAL", "TABELA_OPERACOES", "FATOR_OPERACOES",
    "TABELA_MEDIDAS", "CARTELA", "UNIDADE", "REVENDA", "MODELAGEM",
    "SORTIMENTO_COR", "SORTIMENTO_TAMANHO", "VARIA_PRECO_COR", "VARIA_PRECO_TAM",
    "PONTEIRO_PRECO_TAM", "VARIA_CUSTO_COR", "PERTENCE_A_CONJUNTO", "TRIBUT_ICMS",
    "TRIBUT_ORIGEM", "VARIA_CUSTO_TAM", "CUSTO_REPOSICAO2", "CUSTO_REPOSICAO3",
    "CUSTO_REPOSICAO4", "ESTILISTA", "MODELISTA", "TAMANHO_BASE", "GIRO_ENTREGA",
    "TIMESTAMP", "INATIVO", "ENVIA_LOJA_VAREJO", "ENVIA_LOJA_ATACADO",
    "ENVIA_REPRESENTANTE", "ENVIA_VAREJO_INTERNET", "ENVIA_ATACADO_INTERNET",
    "MODELO", "REDE_LOJAS", "FABRICANTE_ICMS_ABATER", "FABRICANTE_PRAZO_PGTO",
    "TAXA_JUROS_DEFLACIONAR", "TAXAS_IMPOSTOS_APLICAR", "PRECO_REPOSICAO_2",
    "PRECO_REPOSICAO_3", "PRECO_REPOSICAO_4", "PRECO_A_VISTA_REPOSICAO_2",
    "PRECO_A_VISTA_REPOSICAO_3", "PRECO_A_VISTA_REPOSICAO_4", "FABRICANTE_FRETE",
    "DROP_DE_TAMANHOS", "STATUS_PRODUTO", "TIPO_STATUS_PRODUTO", "OBS",
    "COMPOSICAO", "RESTRICAO_LAVAGEM", "ORCAMENTO", "CLIENTE_DO_PRODUTO",
    "CONTA_CONTABIL", "ESPESSURA", "ALTURA", "LARGURA", "COMPRIMENTO",
    "EMPILHAMENTO_MAXIMO", "PARTE_TIPO", "VERSAO_FICHA", "COD_FLUXO_PRODUTO",
    "DATA_INICIO_DESENVOLVIMENTO", "INDICADOR_CFOP", "MONTAGEM_KIT",
    "MRP_AGRUPAR_NECESSIDADE_DIAS", "MRP_AGRUPAR_NECESSIDADE_TIPO",
    "MRP_DIAS_SEGURANCA", "MRP_EMISSAO_LIBERACAO_DIAS", "MRP_ENTREGA_GIRO_DIAS",
    "MRP_PARTICIPANTE", "MRP_MAIOR_GIRO_MP_DIAS", "MRP_FP", "MRP_RR",
    "OP_POR_COR", "OP_QTDE_MAXIMA", "OP_QTDE_MINIMA", "QUALIDADE", "SEMI_ACABADO",
    "CONTA_CONTABIL_COMPRA", "CONTA_CONTABIL_VENDA", "CONTA_CONTABIL_DEV_COMPRA",
    "CONTA_CONTABIL_DEV_VENDA", "ID_EXCECAO_GRUPO", "ID_EXCECAO_IMPOSTO",
    "DIAS_COMPRA", "FATOR_P", "FATOR_Q", "FATOR_F", "CONTINUIDADE",
    "COD_PRODUTO_SOLUCAO", "COD_PRODUTO_SEGMENTO", "ID_PRECO", "TIPO_ITEM_SPED",
    "PERC_COMISSAO", "ACEITA_ENCOMENDA", "DIAS_GARANTIA_LOJA",
    "DIAS_GARANTIA_FABRICANTE", "POSSUI_MONTAGEM", "PERMITE_ENTREGA_FUTURA",
    "NATUREZA_RECEITA", "COD_ALIQUOTA_PIS_COFINS_DIF", "DATA_LIMITE_PEDIDO",
    "LX_STATUS_REGISTRO", "ARREDONDA", "ID_ARTIGO", "LX_HASH", "SPED_DATA_FIM",
    "SPED_DATA_INI", "TIPO_PP", "FATOR_A", "FATOR_B", "FATOR_BUFFER", "FATOR_LT",
    "TIPO_CANAL", "NAO_ENVIA_ETL", "TITULO_B2C", "DESCRICAO_B2C", "PRE_VENDA",
    "TAGS", "VIDEO_EMBED", "CARACTERISTICAS_TECNICAS_B2C", "FRETE_GRATIS",
    "ESTOQUE_MINIMO", "DATA_PUBLICACAO_B2C", "GRUPO_PRODUTO_B2C",
    "SUBGRUPO_PRODUTO_B2C", "TIPO_PRODUTO_B2C", "GRIFFE_B2C", "LINHA_B2C",
    "FABRICANTE_B2C", "CATEGORIA_B2C", "SUBCATEGORIA_B2C", "REPOSICAO_B2C",
    "IMG_ESTILO", "DESCRICAO_B2C_2", "DESCRICAO_B2C_3",
    "SUJEITO_SUBSTITUTICAO_TRIBUTARIA", "OPTION_TITULO", "OPTION_DESC",
    "OPTION_CARACTERISTICA", "EMPRESA", "SEXO_TIPO", "PESO",
    "DIAS_ACERTO_CONSIGNACAO", "POSSUI_GTIN",
];

// Output file stems written by the JSON report writer
pub const PRODUCTS_OUTPUT_FILE: &str = "produtos_tratados";
pub const INVENTORY_OUTPUT_FILE: &str = "estoque_tratados";
pub const SALES_OUTPUT_FILE: &str = "vendas_tratadas";
pub const ECOMMERCE_OUTPUT_FILE: &str = "ecommerce";
pub const ENTRIES_OUTPUT_FILE: &str = "entradas";

/// Map a report name to the file stem it is exported under
pub fn report_output_file(report: &str) -> &str {
    match report {
        PRODUCTS_REPORT => PRODUCTS_OUTPUT_FILE,
        INVENTORY_REPORT => INVENTORY_OUTPUT_FILE,
        SALES_REPORT => SALES_OUTPUT_FILE,
        ECOMMERCE_REPORT => ECOMMERCE_OUTPUT_FILE,
        ENTRIES_REPORT => ENTRIES_OUTPUT_FILE,
        other => other,
    }
}

// Raw snapshot input files
pub const PRODUCTS_INPUT_FILE: &str = "products.json";
pub const INVENTORY_INPUT_FILE: &str = "inventory.json";
pub const SALES_INPUT_FILE: &str = "sales.json";
pub const ECOMMERCE_INPUT_FILE: &str = "ecommerce.json";
pub const ENTRIES_INPUT_FILE: &str = "entries.json";
pub const BARCODES_INPUT_FILE: &str = "barcodes.json";
pub const COLORS_INPUT_FILE: &str = "colors.json";
